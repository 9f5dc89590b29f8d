//! GitHub OAuth/API 클라이언트
//!
//! 인가 URL 생성과 코드 교환은 `oauth2` 크레이트에 맡기고,
//! 프로필 조회는 `reqwest`로 GitHub REST API를 직접 호출합니다.

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use crate::config::GithubSettings;
use crate::domain::entities::GithubTokens;
use crate::domain::models::oauth::{GithubProfile, ProfileValue};
use crate::errors::errors::AppError;

/// 핸드셰이크에 필요한 GitHub 호출
///
/// 테스트에서는 네트워크 없이 가짜 구현으로 교체합니다.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// `state`를 실은 GitHub 인가 페이지 URL
    fn authorize_url(&self, state: &str) -> String;

    async fn exchange_code(&self, code: &str) -> Result<GithubTokens, AppError>;

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, AppError>;
}

type ConfiguredClient = BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// `GET /user/emails` 응답 항목
#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

pub struct GithubHttpClient {
    oauth: ConfiguredClient,
    http: reqwest::Client,
    scopes: Vec<String>,
    api_uri: String,
    user_agent: String,
}

impl GithubHttpClient {
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 인가/토큰/콜백 URL 형식 오류
    pub fn new(settings: &GithubSettings) -> Result<Self, AppError> {
        let invalid = |name: &str, e: oauth2::url::ParseError| {
            AppError::ConfigurationError(format!("{} 형식이 올바르지 않습니다: {}", name, e))
        };

        let oauth = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(settings.auth_uri.clone()).map_err(|e| invalid("GITHUB_AUTH_URI", e))?)
            .set_token_uri(TokenUrl::new(settings.token_uri.clone()).map_err(|e| invalid("GITHUB_TOKEN_URI", e))?)
            .set_redirect_uri(RedirectUrl::new(settings.callback_url.clone()).map_err(|e| invalid("GITHUB_CALLBACK_URL", e))?);

        // 토큰 엔드포인트가 리다이렉트로 응답하면 따라가지 않고 실패로 처리합니다.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            oauth,
            http,
            scopes: settings.scopes.clone(),
            api_uri: settings.api_uri.trim_end_matches('/').to_string(),
            user_agent: settings.user_agent.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, access_token: &str) -> Result<T, AppError> {
        let response = self.http
            .get(format!("{}{}", self.api_uri, path))
            .bearer_auth(access_token)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("GitHub API 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "GitHub API {} 실패 ({}): {}", path, status, error_text
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("GitHub API 응답 파싱 실패: {}", e)))
    }
}

#[async_trait]
impl GithubApi for GithubHttpClient {
    fn authorize_url(&self, state: &str) -> String {
        let state = state.to_string();
        let (url, _) = self.oauth
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .url();

        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<GithubTokens, AppError> {
        let token = self.oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("GitHub 토큰 교환 실패: {}", e)))?;

        Ok(GithubTokens {
            access_token: token.access_token().secret().to_string(),
            refresh_token: token.refresh_token().map(|t| t.secret().to_string()),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, AppError> {
        let raw: serde_json::Value = self.get_json("/user", access_token).await?;
        let mut profile = GithubProfile::from_api(raw)?;

        // 공개 이메일이 없으면 user:email 스코프로 주 이메일을 조회합니다.
        if profile.emails.is_empty() {
            match self.get_json::<Vec<GithubEmail>>("/user/emails", access_token).await {
                Ok(emails) => profile.emails = verified_emails(emails),
                Err(e) => log::debug!("GitHub 이메일 목록 조회 생략: {}", e),
            }
        }

        Ok(profile)
    }
}

/// 검증된 이메일만, 주 이메일을 앞에 둡니다.
fn verified_emails(mut emails: Vec<GithubEmail>) -> Vec<ProfileValue> {
    emails.retain(|e| e.verified);
    emails.sort_by_key(|e| !e.primary);
    emails.into_iter().map(|e| ProfileValue { value: e.email }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GithubHttpClient {
        GithubHttpClient::new(&GithubSettings::with_credentials("client-123", "secret")).unwrap()
    }

    #[test]
    fn test_authorize_url_carries_client_state_and_callback() {
        let url = client().authorize_url("signed.state");
        let parsed = reqwest::Url::parse(&url).unwrap();
        let query: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert_eq!(query.get("client_id").map(String::as_str), Some("client-123"));
        assert_eq!(query.get("state").map(String::as_str), Some("signed.state"));
        assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(
            query.get("redirect_uri").map(String::as_str),
            Some("http://localhost:8888/auth/github/callback")
        );
        assert_eq!(query.get("scope").map(String::as_str), Some("read:user user:email"));
    }

    #[test]
    fn test_invalid_callback_url_is_configuration_error() {
        let mut settings = GithubSettings::with_credentials("id", "secret");
        settings.callback_url = "not a url".to_string();

        assert!(matches!(GithubHttpClient::new(&settings), Err(AppError::ConfigurationError(_))));
    }

    #[test]
    fn test_verified_emails_primary_first() {
        let emails = vec![
            GithubEmail { email: "old@example.com".to_string(), primary: false, verified: true },
            GithubEmail { email: "unverified@example.com".to_string(), primary: false, verified: false },
            GithubEmail { email: "main@example.com".to_string(), primary: true, verified: true },
        ];

        let values: Vec<String> = verified_emails(emails).into_iter().map(|v| v.value).collect();
        assert_eq!(values, vec!["main@example.com", "old@example.com"]);
    }
}
