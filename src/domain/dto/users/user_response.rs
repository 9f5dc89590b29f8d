use serde::{Deserialize, Serialize};
use mongodb::bson::DateTime;
use crate::config::AuthProvider;
use crate::domain::entities::User;
use crate::domain::models::oauth::GithubProfile;

/// 사용자 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub auth_provider: AuthProvider,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub profile_image_url: Option<String>,
    /// 연결된 GitHub 계정 (없으면 null)
    pub github: Option<GithubLinkResponse>,
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
}

/// 연결된 GitHub 계정 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubLinkResponse {
    pub id: String,
    pub login: String,
    pub profile_url: Option<String>,
}

impl From<&GithubProfile> for GithubLinkResponse {
    fn from(profile: &GithubProfile) -> Self {
        Self {
            id: profile.id.clone(),
            login: profile.username.clone(),
            profile_url: profile.profile_url.clone(),
        }
    }
}

impl UserResponse {
    pub fn new(user: User, github: Option<&GithubProfile>) -> Self {
        let User {
            id,
            username,
            display_name,
            email,
            auth_provider,
            is_active,
            roles,
            profile_image_url,
            last_login_at,
            created_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            username,
            display_name,
            email,
            auth_provider,
            is_active,
            roles,
            profile_image_url,
            github: github.map(GithubLinkResponse::from),
            last_login_at,
            created_at,
        }
    }
}
