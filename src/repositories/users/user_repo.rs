//! # 사용자 리포지토리 구현
//!
//! MongoDB `users` 컬렉션을 주 저장소로 사용하고, ID 조회 결과만 Redis에 캐싱합니다.
//!
//! ## 인덱스
//!
//! - `github` (unique, sparse) - 자격 증명 하나에 사용자 하나
//! - `auth` (unique, sparse) - Auth 바인딩 하나에 사용자 하나
//! - `created_at` (desc)

use std::sync::Arc;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, Document}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::User,
    repositories::stores::{UserQuery, UserStore},
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

/// 캐시 TTL (10분)
const CACHE_TTL_SECONDS: u64 = 600;

/// 사용자 데이터 액세스 리포지토리
///
/// - **캐시 키**: `user:{id}` (매크로의 `cache_key()` 사용)
/// - **무효화**: `save` 성공 시 해당 사용자 캐시 제거
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl UserRepository {
    fn filter_for(query: &UserQuery) -> Document {
        match query {
            UserQuery::Github(credential_id) => doc! { "github": credential_id },
            UserQuery::Auth(auth_id) => doc! { "auth": auth_id },
        }
    }

    /// 사용자 컬렉션 인덱스 생성
    ///
    /// 연결 필드는 sparse 인덱스이므로 연결되지 않은 사용자(필드 없음)는 제약 대상이 아닙니다.
    /// 이미 중복 연결된 데이터가 있으면 유니크 인덱스 생성이 실패합니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        let github_index = IndexModel::builder()
            .keys(doc! { "github": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name("github_unique".to_string())
                .build())
            .build();

        let auth_index = IndexModel::builder()
            .keys(doc! { "auth": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name("auth_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([github_index, auth_index, created_at_index])
            .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get(&self, id: &str) -> Result<User, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::NotFound(id.to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(cached);
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let _ = self.redis
            .set_with_expiry(&cache_key, &user, CACHE_TTL_SECONDS)
            .await;

        Ok(user)
    }

    async fn find(&self, query: UserQuery) -> Result<Vec<User>, AppError> {
        let users: Vec<User> = self.collection::<User>()
            .find(Self::filter_for(&query))
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(users)
    }

    async fn create(&self, mut user: User) -> Result<User, AppError> {
        user.id = None;

        let result = self.collection::<User>()
            .insert_one(&user)
            .await?;

        let id = result.inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::InternalError("생성된 사용자 ID가 ObjectId가 아닙니다".to_string()))?;

        user.id = Some(id);
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, AppError> {
        let id = user.id
            .ok_or_else(|| AppError::ValidationError("저장할 사용자에 ID가 없습니다".to_string()))?;

        let result = self.collection::<User>()
            .replace_one(doc! { "_id": id }, &user)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(id.to_hex()));
        }

        let _ = self.invalidate_cache(&id.to_hex()).await;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_queries() {
        let auth_id = ObjectId::new();

        assert_eq!(
            UserRepository::filter_for(&UserQuery::Github("12345".to_string())),
            doc! { "github": "12345" }
        );
        assert_eq!(
            UserRepository::filter_for(&UserQuery::Auth(auth_id)),
            doc! { "auth": auth_id }
        );
    }
}
