//! OAuth state 페이로드
//!
//! 권한 부여 요청의 `state` 파라미터에 실어 보내는 값입니다.
//! 콜백에서 같은 state가 돌아와야 하며, 시작 시점의 의도(로그인/연결)를 되돌려 줍니다.

use serde::{Deserialize, Serialize};

/// OAuth 흐름을 시작한 의도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthIntent {
    /// 익명 요청: 로그인 후 세션을 발급합니다.
    Authenticate,
    /// 로그인된 요청: 현재 세션 사용자에 GitHub를 연결하고 세션은 바꾸지 않습니다.
    Authorize,
}

impl AuthIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthIntent::Authenticate => "authenticate",
            AuthIntent::Authorize => "authorize",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthStatePayload {
    pub intent: AuthIntent,
    /// CSRF 방지용 난수
    pub nonce: String,
    /// 발급 시각 (Unix timestamp)
    pub issued_at: i64,
    /// Authorize 흐름을 시작한 세션 사용자 ID
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
}
