//! 인증 관련 설정
//!
//! GitHub OAuth, 세션 JWT, OAuth state 서명에 필요한 설정값을 환경 변수에서 읽어옵니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! GITHUB_CLIENT_ID=Iv1.xxxxxxxx           # 필수
//! GITHUB_CLIENT_SECRET=xxxxxxxxxxxxxxxx   # 필수
//! GITHUB_CALLBACK_URL=http://localhost:8888/auth/github/callback
//! GITHUB_LINK_MODE=auth                   # auth | direct
//! GITHUB_DUPLICATE_POLICY=reject          # reject | first
//! ```

use std::env;
use crate::errors::errors::AppError;

/// 원본 서비스가 사용하던 고정 콜백 URL
///
/// 요청 호스트와 무관한 리터럴이므로 배포 환경에서는 `GITHUB_CALLBACK_URL`로 덮어써야 합니다.
pub const DEFAULT_GITHUB_CALLBACK_URL: &str = "http://localhost:8888/auth/github/callback";

pub struct GithubOAuthConfig;

impl GithubOAuthConfig {
    pub fn client_id() -> Result<String, AppError> {
        required_var("GITHUB_CLIENT_ID")
    }

    pub fn client_secret() -> Result<String, AppError> {
        required_var("GITHUB_CLIENT_SECRET")
    }

    pub fn callback_url() -> String {
        env::var("GITHUB_CALLBACK_URL")
            .unwrap_or_else(|_| DEFAULT_GITHUB_CALLBACK_URL.to_string())
    }

    pub fn auth_uri() -> String {
        env::var("GITHUB_AUTH_URI")
            .unwrap_or_else(|_| "https://github.com/login/oauth/authorize".to_string())
    }

    pub fn token_uri() -> String {
        env::var("GITHUB_TOKEN_URI")
            .unwrap_or_else(|_| "https://github.com/login/oauth/access_token".to_string())
    }

    pub fn api_uri() -> String {
        env::var("GITHUB_API_URI")
            .unwrap_or_else(|_| "https://api.github.com".to_string())
    }

    /// GitHub API는 User-Agent 헤더가 없으면 요청을 거부합니다.
    pub fn user_agent() -> String {
        env::var("GITHUB_USER_AGENT")
            .unwrap_or_else(|_| "github-auth-service".to_string())
    }

    pub fn scopes() -> Vec<String> {
        env::var("GITHUB_SCOPES")
            .unwrap_or_else(|_| "read:user,user:email".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn link_mode() -> LinkMode {
        env::var("GITHUB_LINK_MODE")
            .map(|v| LinkMode::from_str(&v))
            .unwrap_or_default()
    }

    pub fn duplicate_policy() -> DuplicatePolicy {
        env::var("GITHUB_DUPLICATE_POLICY")
            .map(|v| DuplicatePolicy::from_str(&v))
            .unwrap_or_default()
    }

    pub fn view_path() -> String {
        env::var("GITHUB_VIEW_PATH").unwrap_or_else(|_| "views/github".to_string())
    }
}

/// 필수 환경 변수를 읽고, 없거나 비어 있으면 `ConfigurationError`를 반환합니다.
fn required_var(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::ConfigurationError(format!("{} must be set", name))),
    }
}

/// GitHub 프로바이더 설정 스냅샷
///
/// 시작 시점에 한 번 읽어서 검증한 뒤, 전략과 라우트 구성에 그대로 전달됩니다.
/// 테스트에서는 환경 변수 없이 직접 구성할 수 있습니다.
#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub api_uri: String,
    pub user_agent: String,
    pub scopes: Vec<String>,
    pub link_mode: LinkMode,
    pub duplicate_policy: DuplicatePolicy,
    pub success_redirect: String,
    pub failure_redirect: String,
    pub view_path: String,
}

impl GithubSettings {
    /// 환경 변수에서 설정을 읽어옵니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - `GITHUB_CLIENT_ID` 또는 `GITHUB_CLIENT_SECRET` 누락
    pub fn from_env() -> Result<Self, AppError> {
        let settings = Self {
            client_id: GithubOAuthConfig::client_id()?,
            client_secret: GithubOAuthConfig::client_secret()?,
            callback_url: GithubOAuthConfig::callback_url(),
            auth_uri: GithubOAuthConfig::auth_uri(),
            token_uri: GithubOAuthConfig::token_uri(),
            api_uri: GithubOAuthConfig::api_uri(),
            user_agent: GithubOAuthConfig::user_agent(),
            scopes: GithubOAuthConfig::scopes(),
            link_mode: GithubOAuthConfig::link_mode(),
            duplicate_policy: GithubOAuthConfig::duplicate_policy(),
            success_redirect: RedirectConfig::success(),
            failure_redirect: RedirectConfig::failure(),
            view_path: GithubOAuthConfig::view_path(),
        };

        if settings.callback_url == DEFAULT_GITHUB_CALLBACK_URL {
            log::warn!(
                "GITHUB_CALLBACK_URL 미설정, 고정 콜백 URL 사용: {}",
                DEFAULT_GITHUB_CALLBACK_URL
            );
        }

        Ok(settings)
    }

    /// 기본값으로 채운 설정 (클라이언트 자격 증명만 지정)
    pub fn with_credentials(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            callback_url: DEFAULT_GITHUB_CALLBACK_URL.to_string(),
            auth_uri: "https://github.com/login/oauth/authorize".to_string(),
            token_uri: "https://github.com/login/oauth/access_token".to_string(),
            api_uri: "https://api.github.com".to_string(),
            user_agent: "github-auth-service".to_string(),
            scopes: vec!["read:user".to_string(), "user:email".to_string()],
            link_mode: LinkMode::default(),
            duplicate_policy: DuplicatePolicy::default(),
            success_redirect: "/".to_string(),
            failure_redirect: "/".to_string(),
            view_path: "views/github".to_string(),
        }
    }
}

/// 인증 완료 후 리다이렉트 경로
pub struct RedirectConfig;

impl RedirectConfig {
    pub fn success() -> String {
        env::var("AUTH_SUCCESS_REDIRECT").unwrap_or_else(|_| "/".to_string())
    }

    pub fn failure() -> String {
        env::var("AUTH_FAILURE_REDIRECT").unwrap_or_else(|_| "/".to_string())
    }
}

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24)
    }
}

pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                "oauth-state-secret".to_string()
            })
    }

    pub fn session_timeout_minutes() -> i64 {
        env::var("OAUTH_SESSION_TIMEOUT_MINUTES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10)
    }
}

/// 인증 프로바이더
///
/// 전략 이름과 세션 토큰의 `auth_provider` 클레임에 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthProvider {
    GitHub,
}

impl AuthProvider {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "github" => Ok(AuthProvider::GitHub),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::GitHub => "github",
        }
    }
}

/// 외부 신원과 로컬 사용자를 연결하는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// `user.github`가 자격 증명 ID를 직접 참조
    Direct,
    /// `auth.github` 바인딩을 거쳐 `user.auth`가 Auth ID를 참조
    #[default]
    Auth,
}

impl LinkMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "direct" | "user" => LinkMode::Direct,
            _ => LinkMode::Auth,
        }
    }
}

/// 하나의 자격 증명에 여러 사용자(또는 Auth)가 연결되어 있을 때의 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// 경고 로그 후 `ConflictError` 반환
    #[default]
    Reject,
    /// 경고 로그 후 첫 번째 레코드 사용
    FirstMatch,
}

impl DuplicatePolicy {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "first" | "first_match" | "pick_first" => DuplicatePolicy::FirstMatch,
            _ => DuplicatePolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!(AuthProvider::from_str("github").unwrap(), AuthProvider::GitHub);
        assert_eq!(AuthProvider::from_str("GitHub").unwrap(), AuthProvider::GitHub);

        // 지원하지 않는 프로바이더
        assert!(AuthProvider::from_str("google").is_err());
        assert!(AuthProvider::from_str("unknown").is_err());
    }

    #[test]
    fn test_auth_provider_serialization() {
        let provider = AuthProvider::GitHub;
        let json = serde_json::to_string(&provider).unwrap();
        let deserialized: AuthProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(provider, deserialized);
        assert_eq!(provider.as_str(), "github");
    }

    #[test]
    fn test_link_mode_parsing() {
        assert_eq!(LinkMode::from_str("direct"), LinkMode::Direct);
        assert_eq!(LinkMode::from_str("AUTH"), LinkMode::Auth);
        assert_eq!(LinkMode::from_str("whatever"), LinkMode::Auth);
        assert_eq!(LinkMode::default(), LinkMode::Auth);
    }

    #[test]
    fn test_duplicate_policy_parsing() {
        assert_eq!(DuplicatePolicy::from_str("first"), DuplicatePolicy::FirstMatch);
        assert_eq!(DuplicatePolicy::from_str("reject"), DuplicatePolicy::Reject);
        assert_eq!(DuplicatePolicy::from_str(""), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_settings_with_credentials_defaults() {
        let settings = GithubSettings::with_credentials("id", "secret");

        assert_eq!(settings.callback_url, DEFAULT_GITHUB_CALLBACK_URL);
        assert_eq!(settings.success_redirect, "/");
        assert_eq!(settings.failure_redirect, "/");
        assert_eq!(settings.link_mode, LinkMode::Auth);
    }

    #[test]
    fn test_required_var_rejects_missing() {
        let result = required_var("GITHUB_AUTH_SERVICE_TEST_SURELY_UNSET");
        assert!(matches!(result, Err(AppError::ConfigurationError(_))));
    }
}
