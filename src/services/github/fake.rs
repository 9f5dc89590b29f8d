//! 네트워크 없이 핸드셰이크를 흉내 내는 GitHub API

use async_trait::async_trait;
use serde_json::json;
use crate::domain::entities::GithubTokens;
use crate::domain::models::oauth::GithubProfile;
use crate::errors::errors::AppError;
use crate::services::github::client::GithubApi;

/// 인가 코드는 GitHub 사용자 id 문자열로 취급합니다 (`"42"` → `octo42`).
/// `"denied"`는 토큰 교환 실패입니다.
pub struct FakeGithubApi;

#[async_trait]
impl GithubApi for FakeGithubApi {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://github.test/login/oauth/authorize?state={}", state)
    }

    async fn exchange_code(&self, code: &str) -> Result<GithubTokens, AppError> {
        if code == "denied" {
            return Err(AppError::ExternalServiceError("bad_verification_code".to_string()));
        }
        Ok(GithubTokens {
            access_token: code.to_string(),
            refresh_token: None,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, AppError> {
        let id: u64 = access_token
            .parse()
            .map_err(|_| AppError::ExternalServiceError("Bad credentials".to_string()))?;

        GithubProfile::from_api(json!({
            "id": id,
            "login": format!("octo{}", id),
            "name": format!("Octo {}", id),
            "html_url": format!("https://github.com/octo{}", id),
            "avatar_url": format!("https://avatars.githubusercontent.com/u/{}", id),
            "email": format!("octo{}@example.com", id),
        }))
    }
}
