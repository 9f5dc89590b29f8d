//! 세션 JWT 관리 서비스
//!
//! GitHub 로그인에 성공한 로컬 사용자에게 HS256 세션 토큰을 발급하고,
//! 이후 요청에서 이 토큰으로 현재 로그인 사용자를 복원합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::JwtConfig,
    domain::entities::users::user::User,
};
use crate::domain::models::token::{SessionToken, TokenClaims};
use crate::errors::errors::AppError;

/// 세션 토큰 쿠키 이름
pub const SESSION_COOKIE_NAME: &str = "access_token";

/// 세션 JWT 서비스
///
/// HMAC-SHA256 서명, 만료 시간은 `JWT_EXPIRATION_HOURS` (기본 24시간).
#[service(name="token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 사용자 세션 토큰 생성
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 사용자 ID가 없거나 서명 실패
    ///
    /// ```rust,ignore
    /// let token_service = TokenService::instance();
    /// let session = token_service.issue_session(&user)?;
    /// ```
    pub fn issue_session(&self, user: &User) -> Result<SessionToken, AppError> {
        let now = Utc::now();
        let expiration_hours = JwtConfig::expiration_hours();
        let expiration = now + Duration::hours(expiration_hours);

        let claims = TokenClaims {
            sub: user.id_string().ok_or_else(|| {
                AppError::InternalError("사용자 ID가 없습니다".to_string())
            })?,
            auth_provider: user.auth_provider,
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let secret = JwtConfig::secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        let access_token = encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))?;

        Ok(SessionToken {
            access_token,
            expires_in: expiration_hours * 3600,
        })
    }

    /// 세션 토큰 검증 및 클레임 추출
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 만료, 잘못된 형식/서명
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let secret = JwtConfig::secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
                },
                _ => AppError::AuthenticationError(format!("유효하지 않은 토큰입니다: {}", e)),
            })
    }

    /// `Authorization: Bearer {token}` 헤더에서 토큰 부분만 추출합니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;
    use crate::domain::models::oauth::GithubProfile;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    fn service() -> std::sync::Arc<TokenService> {
        TokenService::instance()
    }

    fn stored_user() -> User {
        let profile = GithubProfile::from_api(json!({ "id": 7, "login": "octocat" })).unwrap();
        let mut user = User::from_github_profile(&profile);
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_issue_and_verify_session() {
        let user = stored_user();
        let session = service().issue_session(&user).unwrap();

        let claims = service().verify_token(&session.access_token).unwrap();

        assert_eq!(claims.sub, user.id_string().unwrap());
        assert_eq!(claims.auth_provider, AuthProvider::GitHub);
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert!(session.expires_in > 0);
    }

    #[test]
    fn test_issue_requires_stored_user() {
        let mut user = stored_user();
        user.id = None;

        assert!(matches!(service().issue_session(&user), Err(AppError::InternalError(_))));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            service().verify_token("not.a.jwt"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(service().extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(service().extract_bearer_token("Basic abc").is_err());
        assert!(service().extract_bearer_token("Bearer ").is_err());
    }
}
