//! GitHub 자격 증명 엔티티
//!
//! GitHub 사용자 ID로 키가 지정되는 레코드로, 마지막으로 받은 토큰과 프로필을 보관합니다.
//! 사용자 레코드보다 먼저 저장되며, 이후 재조정 단계가 이 ID로 사용자를 찾습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::models::oauth::GithubProfile;

/// GitHub가 발급한 토큰 쌍
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubTokens {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for GithubTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubTokens")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubCredential {
    /// GitHub 사용자 ID (`profile.id`와 동일)
    pub id: String,
    pub credentials: GithubTokens,
    pub profile: GithubProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GithubCredential {
    pub fn new(profile: GithubProfile, credentials: GithubTokens) -> Self {
        let now = Utc::now();

        Self {
            id: profile.id.clone(),
            credentials,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// 새로 받은 토큰과 프로필로 덮어씁니다. 생성 시각은 유지됩니다.
    pub fn refresh(&mut self, profile: GithubProfile, credentials: GithubTokens) {
        self.credentials = credentials;
        self.profile = profile;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens(access: &str) -> GithubTokens {
        GithubTokens { access_token: access.to_string(), refresh_token: None }
    }

    #[test]
    fn test_credential_keyed_by_profile_id() {
        let profile = GithubProfile::from_api(json!({ "id": 12345, "login": "octocat" })).unwrap();
        let credential = GithubCredential::new(profile, tokens("gho_first"));

        assert_eq!(credential.id, "12345");
        assert_eq!(credential.credentials.access_token, "gho_first");
    }

    #[test]
    fn test_refresh_replaces_tokens_and_profile() {
        let profile = GithubProfile::from_api(json!({ "id": 1, "login": "old" })).unwrap();
        let mut credential = GithubCredential::new(profile, tokens("a"));
        let created_at = credential.created_at;

        let renamed = GithubProfile::from_api(json!({ "id": 1, "login": "new" })).unwrap();
        credential.refresh(renamed, tokens("b"));

        assert_eq!(credential.credentials.access_token, "b");
        assert_eq!(credential.profile.username, "new");
        assert_eq!(credential.created_at, created_at);
    }

    #[test]
    fn test_tokens_debug_is_masked() {
        let debug = format!("{:?}", tokens("gho_secret"));
        assert!(!debug.contains("gho_secret"));
    }
}
