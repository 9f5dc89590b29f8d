//! GitHub 외부 프로필
//!
//! GitHub `GET /user` 응답을 정규화한 프로필입니다. 파싱한 필드와 함께 원본 JSON을
//! `_json`으로 보관하여 자격 증명 레코드에 그대로 저장합니다.

use serde::{Deserialize, Serialize};
use crate::errors::errors::AppError;

/// 프로필 이메일 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileValue {
    pub value: String,
}

/// 정규화된 GitHub 프로필
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubProfile {
    /// GitHub 사용자 고유 ID (숫자를 문자열로 보관)
    pub id: String,
    /// 로그인 이름 (`login`)
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub emails: Vec<ProfileValue>,
    #[serde(default)]
    pub photos: Vec<ProfileValue>,
    /// GitHub API 원본 응답
    #[serde(rename = "_json", default)]
    pub raw: serde_json::Value,
}

impl GithubProfile {
    /// GitHub API `/user` 응답에서 프로필을 만듭니다.
    ///
    /// `id`와 `login`은 필수이며, 없으면 `ExternalServiceError`를 반환합니다.
    pub fn from_api(raw: serde_json::Value) -> Result<Self, AppError> {
        let id = match raw.get("id") {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(AppError::ExternalServiceError(
                    "GitHub 프로필에 id가 없습니다".to_string(),
                ))
            }
        };

        let username = raw
            .get("login")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::ExternalServiceError("GitHub 프로필에 login이 없습니다".to_string()))?
            .to_string();

        let text = |key: &str| {
            raw.get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let display_name = text("name");
        let profile_url = text("html_url");
        let emails = text("email").map(|value| vec![ProfileValue { value }]).unwrap_or_default();
        let photos = text("avatar_url").map(|value| vec![ProfileValue { value }]).unwrap_or_default();

        Ok(Self {
            id,
            username,
            display_name,
            profile_url,
            emails,
            photos,
            raw,
        })
    }

    /// 대표 이메일 (공개 이메일이 없으면 None)
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(|e| e.value.as_str())
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.photos.first().map(|p| p.value.as_str())
    }

    /// 표시 이름이 없으면 로그인 이름을 사용합니다.
    pub fn display_name_or_login(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_api_full_profile() {
        let raw = json!({
            "id": 583231,
            "login": "octocat",
            "name": "The Octocat",
            "html_url": "https://github.com/octocat",
            "email": "octocat@github.com",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4"
        });

        let profile = GithubProfile::from_api(raw.clone()).unwrap();

        assert_eq!(profile.id, "583231");
        assert_eq!(profile.username, "octocat");
        assert_eq!(profile.display_name_or_login(), "The Octocat");
        assert_eq!(profile.primary_email(), Some("octocat@github.com"));
        assert_eq!(profile.avatar_url(), Some("https://avatars.githubusercontent.com/u/583231?v=4"));
        assert_eq!(profile.raw, raw);
    }

    #[test]
    fn test_from_api_minimal_profile() {
        let profile = GithubProfile::from_api(json!({ "id": 1, "login": "ghost", "name": null, "email": "" })).unwrap();

        assert_eq!(profile.display_name, None);
        assert_eq!(profile.display_name_or_login(), "ghost");
        assert!(profile.emails.is_empty());
        assert!(profile.photos.is_empty());
    }

    #[test]
    fn test_from_api_requires_id_and_login() {
        assert!(GithubProfile::from_api(json!({ "login": "ghost" })).is_err());
        assert!(GithubProfile::from_api(json!({ "id": 1 })).is_err());
    }

    #[test]
    fn test_serialized_shape_keeps_raw_json() {
        let profile = GithubProfile::from_api(json!({ "id": 9, "login": "nine" })).unwrap();
        let value = serde_json::to_value(&profile).unwrap();

        assert_eq!(value["_json"]["login"], "nine");
        assert!(value.get("displayName").is_none());
    }
}
