//! GitHub 인증 서비스 백엔드
//!
//! GitHub OAuth 2.0 로그인을 제공하고, 외부 GitHub 신원을 로컬 사용자 레코드와
//! 재조정(reconcile)하는 서비스입니다.
//!
//! # Features
//!
//! - **GitHub OAuth**: 서명된 state 기반 핸드셰이크 (`/auth/github`, 콜백)
//! - **신원 재조정**: 자격 증명 upsert, 사용자 찾기/생성, 로그인된 사용자에 계정 연결
//! - **연결 모드**: 사용자 → GitHub 직접 참조(`direct`) 또는 Auth 바인딩 경유(`auth`)
//! - **세션**: HS256 JWT (`access_token` 쿠키 또는 Bearer 헤더)
//! - **저장소**: MongoDB + Redis 캐시, 또는 프로세스 메모리
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /auth/github, 콜백, /auth/me, /health
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 리다이렉트, 세션 쿠키
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  AuthRuntime    │ ← state 발급/검증, 전략 레지스트리
//! │  GithubStrategy │ ← 코드 교환, 프로필 조회
//! │  Reconciler     │ ← 로컬 레코드 결정
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Stores      │ ← Credential / User / Auth
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use github_auth_service::services::auth::{AuthRuntime, OAuthStateSigner};
//! use github_auth_service::services::github::{GithubHttpClient, GithubProvider};
//!
//! let runtime = Arc::new(AuthRuntime::new(OAuthStateSigner::from_env()));
//! let api = Arc::new(GithubHttpClient::new(&settings)?);
//! let provider = GithubProvider::start(settings, runtime.clone(), api, reconciler).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
