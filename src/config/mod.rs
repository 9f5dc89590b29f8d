//! # Configuration Module
//!
//! 서비스 설정을 환경 변수 기반으로 중앙 관리하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, 요청 속도 제한
//! - [`auth_config`] - GitHub OAuth, 세션 JWT, OAuth state 설정
//!
//! ## 설계 원칙
//!
//! - 비밀값(클라이언트 시크릿, JWT 시크릿)은 환경 변수로만 제공합니다.
//! - 필수 값이 없으면 시작 단계에서 `ConfigurationError`로 실패합니다.
//! - 선택 값은 개발 환경에서 바로 동작하는 기본값을 가집니다.
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="127.0.0.1"
//! export PORT="8888"
//!
//! # GitHub OAuth (필수)
//! export GITHUB_CLIENT_ID="your-client-id"
//! export GITHUB_CLIENT_SECRET="your-client-secret"
//! export GITHUB_CALLBACK_URL="https://yourdomain.com/auth/github/callback"
//!
//! # 세션
//! export JWT_SECRET="your-super-secret-key"
//! export OAUTH_STATE_SECRET="oauth-secret"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
