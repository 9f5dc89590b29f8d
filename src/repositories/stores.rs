//! 저장소 계약
//!
//! 모든 `get`은 레코드가 없을 때 [`AppError::NotFound`]를 반환해야 합니다.
//! 유니크 제약(자격 증명 ID, `user.github`, `user.auth`, `auth.github`)을 위반하는 쓰기는
//! [`AppError::ConflictError`]로 실패해야 합니다.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::{Auth, GithubCredential, User};
use crate::errors::errors::AppError;

/// GitHub 자격 증명 저장소 (GitHub 사용자 ID로 키 지정)
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<GithubCredential, AppError>;

    async fn create(&self, credential: GithubCredential) -> Result<GithubCredential, AppError>;

    async fn update(&self, credential: GithubCredential) -> Result<GithubCredential, AppError>;
}

/// 사용자 조회 조건
#[derive(Debug, Clone, PartialEq)]
pub enum UserQuery {
    /// `user.github == credential_id`
    Github(String),
    /// `user.auth == auth_id`
    Auth(ObjectId),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<User, AppError>;

    /// 조건에 맞는 모든 사용자 (0, 1, 또는 여러 명)
    async fn find(&self, query: UserQuery) -> Result<Vec<User>, AppError>;

    /// 새 사용자를 저장하고 ID가 할당된 레코드를 반환합니다.
    async fn create(&self, user: User) -> Result<User, AppError>;

    /// ID가 있는 기존 사용자를 덮어씁니다.
    async fn save(&self, user: User) -> Result<User, AppError>;
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Auth, AppError>;

    /// `auth.github == credential_id`인 모든 바인딩
    async fn find_by_github(&self, credential_id: &str) -> Result<Vec<Auth>, AppError>;

    async fn create(&self, auth: Auth) -> Result<Auth, AppError>;

    async fn save(&self, auth: Auth) -> Result<Auth, AppError>;
}
