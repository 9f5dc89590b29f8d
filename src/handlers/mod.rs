//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다. 경로 등록은 [`crate::routes`]가 맡습니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리        ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   AuthRuntime / GithubStrategy                   ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   CredentialStore / UserStore / AuthStore        ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - **`github`**: OAuth 시작/콜백, 로그인 뷰
//! - **`users`**: 현재 세션 사용자 조회 (`GET /auth/me`)

pub mod github;
pub mod users;
