//! OAuth state 서명/검증
//!
//! 서버에 state를 저장하지 않고, 페이로드를 서명해서 `state` 파라미터에 그대로 싣습니다.
//!
//! ```text
//! state = base64url(json{intent, nonce, issued_at, user_id?}) "." base64url(hmac_sha256(payload))
//! ```
//!
//! 콜백에서는 서명, 만료(`OAUTH_SESSION_TIMEOUT_MINUTES`), 형식을 차례로 확인합니다.
//! nonce는 발급한 브라우저의 쿠키에도 따로 저장되며, 콜백에서 두 값이 같아야 합니다.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use crate::config::OAuthConfig;
use crate::domain::models::oauth::{AuthIntent, OAuthStatePayload};
use crate::errors::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

/// 발급된 state와 그 안에 담긴 nonce
#[derive(Debug, Clone)]
pub struct IssuedState {
    pub state: String,
    pub nonce: String,
}

/// state 서명기
#[derive(Clone)]
pub struct OAuthStateSigner {
    secret: String,
    ttl: Duration,
}

impl OAuthStateSigner {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// `OAUTH_STATE_SECRET`, `OAUTH_SESSION_TIMEOUT_MINUTES`로 구성합니다.
    pub fn from_env() -> Self {
        Self::new(
            OAuthConfig::state_secret(),
            Duration::minutes(OAuthConfig::session_timeout_minutes()),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::InternalError(format!("state 서명 키 오류: {}", e)))
    }

    /// 새 state 값을 발급합니다.
    pub fn issue(&self, intent: AuthIntent, user_id: Option<&str>) -> Result<IssuedState, AppError> {
        let payload = OAuthStatePayload {
            intent,
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            issued_at: Utc::now().timestamp(),
            user_id: user_id.map(str::to_string),
        };

        let state = self.sign(&payload)?;
        Ok(IssuedState { state, nonce: payload.nonce })
    }

    fn sign(&self, payload: &OAuthStatePayload) -> Result<String, AppError> {
        let json = serde_json::to_vec(payload)
            .map_err(|e| AppError::InternalError(format!("state 직렬화 실패: {}", e)))?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload_b64.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload_b64, signature_b64))
    }

    /// 콜백으로 돌아온 state를 검증하고 페이로드를 돌려줍니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 형식 오류, 서명 불일치, 만료
    pub fn verify(&self, state: &str) -> Result<OAuthStatePayload, AppError> {
        let invalid = || AppError::AuthenticationError("유효하지 않은 OAuth state".to_string());

        let (payload_b64, signature_b64) = state.split_once('.').ok_or_else(invalid)?;

        let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|_| invalid())?;
        let mut mac = self.mac()?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let payload_bytes = URL_SAFE_NO_PAD.decode(payload_b64).map_err(|_| invalid())?;
        let payload: OAuthStatePayload = serde_json::from_slice(&payload_bytes).map_err(|_| invalid())?;

        let age = Utc::now().timestamp() - payload.issued_at;
        if age > self.ttl.num_seconds() {
            return Err(AppError::AuthenticationError("OAuth state가 만료되었습니다".to_string()));
        }

        Ok(payload)
    }
}
