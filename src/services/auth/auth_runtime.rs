//! 인증 런타임
//!
//! 시작된 프로바이더와 등록된 전략을 보관하고, 핸드셰이크 시작/완료를 중개합니다.
//!
//! ```text
//! GET /auth/github           authenticate("github")         익명 요청
//!                            authorize("github", session)   로그인된 요청
//!                                 └─ state 발급 → strategy.authorization_url(state)
//!                                    nonce는 브라우저 쿠키로 전달
//!
//! GET /auth/github/callback  complete("github", query, session, cookie nonce)
//!                                 ├─ code/state 검증
//!                                 ├─ state의 nonce와 쿠키 nonce 대조
//!                                 ├─ state의 의도(intent)와 현재 세션 대조
//!                                 └─ strategy.handle_callback(code, session?)
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use crate::config::AuthProvider;
use crate::domain::dto::auth::GithubCallbackQuery;
use chrono::Duration;
use crate::domain::entities::User;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::oauth::AuthIntent;
use crate::errors::errors::AppError;
use crate::services::auth::oauth_state::OAuthStateSigner;
use crate::services::auth::strategy::Strategy;

/// 핸드셰이크 시작 시 발급한 state nonce를 담는 쿠키
pub const STATE_COOKIE_NAME: &str = "github_oauth_state";

/// 핸드셰이크 시작 결과
///
/// `url`로 리다이렉트하고 `nonce`는 같은 브라우저에 쿠키로 남겨야 합니다.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub url: String,
    pub nonce: String,
}

/// 콜백 처리 결과
#[derive(Debug, Clone)]
pub struct Completion {
    pub intent: AuthIntent,
    pub user: User,
}

pub struct AuthRuntime {
    signer: OAuthStateSigner,
    started: RwLock<HashSet<&'static str>>,
    strategies: RwLock<HashMap<&'static str, Arc<dyn Strategy>>>,
}

impl AuthRuntime {
    pub fn new(signer: OAuthStateSigner) -> Self {
        Self {
            signer,
            started: RwLock::new(HashSet::new()),
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// state 유효 시간. nonce 쿠키 수명도 이 값을 따릅니다.
    pub fn state_ttl(&self) -> Duration {
        self.signer.ttl()
    }

    /// 프로바이더를 시작 상태로 표시합니다. 이미 시작된 프로바이더면 아무것도 하지 않습니다.
    pub async fn start(&self, provider: AuthProvider) -> Result<(), AppError> {
        let inserted = self.started
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(provider.as_str());

        if inserted {
            log::info!("🚀 인증 프로바이더 시작: {}", provider.as_str());
        }
        Ok(())
    }

    /// 전략을 등록합니다. 같은 이름의 전략이 이미 있으면 `ConfigurationError`입니다.
    pub async fn use_strategy(&self, strategy: Arc<dyn Strategy>) -> Result<(), AppError> {
        let name = strategy.name();
        let mut strategies = self.strategies.write().unwrap_or_else(|e| e.into_inner());

        if strategies.contains_key(name) {
            return Err(AppError::ConfigurationError(format!("strategy {} is already registered", name)));
        }

        strategies.insert(name, strategy);
        log::info!("🔌 인증 전략 등록: {}", name);
        Ok(())
    }

    fn strategy(&self, name: &str) -> Result<Arc<dyn Strategy>, AppError> {
        let strategy = self.strategies
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::ConfigurationError(format!("strategy {} is not registered", name)))?;

        let started = self.started
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(strategy.provider().as_str());

        if !started {
            return Err(AppError::ConfigurationError(format!(
                "provider {} is not started", strategy.provider().as_str()
            )));
        }

        Ok(strategy)
    }

    /// 로그인 핸드셰이크
    pub fn authenticate(&self, name: &str) -> Result<Handshake, AppError> {
        let strategy = self.strategy(name)?;
        let issued = self.signer.issue(AuthIntent::Authenticate, None)?;
        Ok(Handshake {
            url: strategy.authorization_url(&issued.state),
            nonce: issued.nonce,
        })
    }

    /// 현재 세션 사용자에 외부 계정을 연결하는 핸드셰이크
    pub fn authorize(&self, name: &str, session_user: &AuthenticatedUser) -> Result<Handshake, AppError> {
        let strategy = self.strategy(name)?;
        let issued = self.signer.issue(AuthIntent::Authorize, Some(&session_user.user_id))?;
        Ok(Handshake {
            url: strategy.authorization_url(&issued.state),
            nonce: issued.nonce,
        })
    }

    /// 콜백을 검증하고 전략의 검증 콜백을 실행합니다.
    ///
    /// `browser_nonce`는 핸드셰이크를 시작한 브라우저의 state 쿠키 값이며,
    /// 없거나 state의 nonce와 다르면 code 교환 전에 실패합니다.
    /// Authorize로 시작한 흐름은 콜백 시점에도 같은 사용자의 세션이 있어야 합니다.
    /// Authenticate로 시작한 흐름은 세션과 무관하게 로그인으로 처리합니다.
    pub async fn complete(
        &self,
        name: &str,
        query: GithubCallbackQuery,
        session_user: Option<&AuthenticatedUser>,
        browser_nonce: Option<&str>,
    ) -> Result<Completion, AppError> {
        let strategy = self.strategy(name)?;
        let outcome = query.into_outcome()?;
        let state = self.signer.verify(&outcome.state)?;

        if browser_nonce != Some(state.nonce.as_str()) {
            return Err(AppError::AuthenticationError(
                "OAuth state가 이 브라우저에서 시작되지 않았습니다".to_string(),
            ));
        }

        let linking_user = match state.intent {
            AuthIntent::Authenticate => None,
            AuthIntent::Authorize => {
                let session = session_user.ok_or_else(|| {
                    AppError::AuthenticationError("계정 연결 중 세션이 만료되었습니다".to_string())
                })?;

                if state.user_id.as_deref() != Some(session.user_id.as_str()) {
                    return Err(AppError::AuthenticationError(
                        "계정 연결을 시작한 사용자와 현재 세션이 다릅니다".to_string(),
                    ));
                }
                Some(session)
            }
        };

        let user = strategy.handle_callback(&outcome.code, linking_user).await?;

        Ok(Completion {
            intent: state.intent,
            user,
        })
    }
}
