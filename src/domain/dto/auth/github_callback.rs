//! GitHub 콜백 쿼리 파라미터

use serde::Deserialize;
use validator::Validate;
use crate::errors::errors::AppError;
use crate::utils::string_utils::{clean_optional_string, validate_required_string};

/// `GET /auth/github/callback` 쿼리
///
/// GitHub는 성공 시 `code`와 `state`를, 사용자가 거부하면 `error`를 돌려줍니다.
/// 어떤 값이 빠져도 역직렬화는 성공해야 실패 리다이렉트로 처리할 수 있습니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GithubCallbackQuery {
    #[validate(length(min = 1, max = 512, message = "Authorization code 형식이 올바르지 않습니다"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 2048, message = "State 형식이 올바르지 않습니다"))]
    pub state: Option<String>,

    pub error: Option<String>,

    pub error_description: Option<String>,
}

/// 검증을 통과한 콜백 파라미터
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackOutcome {
    pub code: String,
    pub state: String,
}

impl GithubCallbackQuery {
    /// 콜백 쿼리를 코드/state 쌍으로 변환합니다.
    ///
    /// # Errors
    ///
    /// * `AuthenticationError` - GitHub가 `error`를 돌려준 경우 (사용자 거부 등)
    /// * `ValidationError` - `code` 또는 `state`가 없거나 형식이 잘못된 경우
    pub fn into_outcome(self) -> Result<CallbackOutcome, AppError> {
        if let Some(error) = clean_optional_string(self.error.clone()) {
            let description = clean_optional_string(self.error_description.clone()).unwrap_or_default();
            return Err(AppError::AuthenticationError(
                format!("GitHub 인증 거부: {} {}", error, description).trim_end().to_string(),
            ));
        }

        self.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let code = validate_required_string(self.code.as_deref().unwrap_or_default(), "code")?;
        let state = validate_required_string(self.state.as_deref().unwrap_or_default(), "state")?;

        Ok(CallbackOutcome { code, state })
    }
}
