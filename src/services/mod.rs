//! 비즈니스 로직 서비스 계층
//!
//! - [`auth`] - 세션 JWT, OAuth state, 인증 런타임과 전략 계약
//! - [`github`] - GitHub 전략, 신원 재조정, 프로바이더 시작 시퀀스
//! - [`view`] - 프로바이더 HTML 뷰

pub mod auth;
pub mod github;
pub mod view;
