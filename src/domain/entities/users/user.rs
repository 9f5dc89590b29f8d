//! User Entity Implementation
//!
//! 애플리케이션 로컬 사용자 엔티티입니다.
//! GitHub 신원과는 `github`(직접 연결) 또는 `auth`(Auth 바인딩 경유) 필드로 연결됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;
use crate::domain::models::oauth::GithubProfile;
use crate::utils::string_utils::username_from_login;

/// 사용자 엔티티
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이름 (GitHub 로그인에서 파생)
    pub username: String,
    /// 표시 이름
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 직접 연결된 GitHub 자격 증명 ID
    ///
    /// 값이 없으면 필드 자체를 저장하지 않아야 sparse unique 인덱스가 동작합니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// 연결된 Auth 바인딩 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<ObjectId>,
    /// 최초 가입 프로바이더
    pub auth_provider: AuthProvider,
    /// 계정 활성화 여부
    pub is_active: bool,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// GitHub 프로필로 새 사용자를 만듭니다. 연결 필드는 비어 있습니다.
    pub fn from_github_profile(profile: &GithubProfile) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username: username_from_login(&profile.username, &profile.id),
            display_name: profile.display_name_or_login().to_string(),
            email: profile.primary_email().map(str::to_string),
            github: None,
            auth: None,
            auth_provider: AuthProvider::GitHub,
            is_active: true,
            roles: vec!["user".to_string()],
            profile_image_url: profile.avatar_url().map(str::to_string),
            last_login_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// GitHub 자격 증명을 직접 연결합니다.
    pub fn link_github(&mut self, credential_id: &str) {
        self.github = Some(credential_id.to_string());
        self.updated_at = DateTime::now();
    }

    /// Auth 바인딩을 연결합니다.
    pub fn link_auth(&mut self, auth_id: ObjectId) {
        self.auth = Some(auth_id);
        self.updated_at = DateTime::now();
    }

    pub fn mark_login(&mut self) {
        let now = DateTime::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}
