//! 인증 서비스 모듈
//!
//! - [`TokenService`] - 로컬 세션 JWT 발급/검증 (`#[service]` 싱글톤)
//! - [`OAuthStateSigner`] - CSRF 방지용 서명 state
//! - [`AuthRuntime`] - 프로바이더/전략 레지스트리, authenticate/authorize/complete
//! - [`Strategy`] - 외부 인증 전략 계약

pub mod token_service;
pub mod oauth_state;
pub mod strategy;
pub mod auth_runtime;

pub use token_service::*;
pub use oauth_state::{IssuedState, OAuthStateSigner};
pub use strategy::Strategy;
pub use auth_runtime::{AuthRuntime, Completion, Handshake, STATE_COOKIE_NAME};
