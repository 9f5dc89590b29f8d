//! 미들웨어 모듈
//!
//! ### 세션 미들웨어 (AuthMiddleware)
//! - `access_token` 쿠키 또는 `Authorization: Bearer` 헤더에서 세션 JWT 추출
//! - 검증된 사용자 정보를 request extension에 저장
//! - 선택적/강제 인증 모드 지원
//!
//! GitHub 시작/콜백 라우트는 `optional()`로 감싸서, 세션 유무에 따라
//! 로그인(authenticate)과 계정 연결(authorize)을 구분합니다.
//!
//! ```rust,ignore
//! cfg.service(
//!     web::resource("/auth/github")
//!         .wrap(AuthMiddleware::optional())
//!         .route(web::get().to(handlers::github::begin)),
//! )
//! .service(
//!     web::resource("/auth/me")
//!         .wrap(AuthMiddleware::required())
//!         .route(web::get().to(handlers::users::me)),
//! );
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
