//! API 라우트 설정 모듈
//!
//! GitHub 프로바이더의 라우트 테이블([`GithubRoutes`])을 받아 핸들러를 등록합니다.
//! 콜백 경로는 `GITHUB_CALLBACK_URL`에서 오므로 고정 scope 대신 resource 단위로 등록합니다.
//!
//! # Routes
//!
//! | Method | Path                    | 인증      | 핸들러                      |
//! |--------|-------------------------|-----------|-----------------------------|
//! | GET    | `/health`               | 없음      | `health_check`              |
//! | GET    | `/auth/github`          | 선택      | `handlers::github::begin`   |
//! | GET    | `{callback}`            | 선택      | `handlers::github::callback`|
//! | GET    | `/auth/github/login`    | 없음      | `handlers::github::login_page` |
//! | GET    | `/auth/me`              | 필수      | `handlers::users::me`       |
//!
//! # Examples
//!
//! ```rust,ignore
//! let routes = provider.routes.clone();
//! let app = App::new()
//!     .app_data(runtime.clone())
//!     .app_data(provider.clone())
//!     .configure(|cfg| configure_all_routes(cfg, &routes));
//! ```

use actix_web::web;
use serde_json::json;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::github::GithubRoutes;

/// 모든 라우트를 설정합니다
///
/// 핸들러는 `web::Data<AuthRuntime>`와 `web::Data<GithubProvider>`를 앱 데이터로 요구합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig, routes: &GithubRoutes) {
    cfg.service(health_check);

    configure_github_routes(cfg, routes);
    configure_user_routes(cfg);
}

/// GitHub OAuth 라우트
///
/// 시작/콜백은 선택적 세션 미들웨어로 감싸서 로그인과 계정 연결을 구분합니다.
fn configure_github_routes(cfg: &mut web::ServiceConfig, routes: &GithubRoutes) {
    cfg.service(
        web::resource(routes.begin.as_str())
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(handlers::github::begin)),
    )
    .service(
        web::resource(routes.callback.as_str())
            .wrap(AuthMiddleware::optional())
            .route(web::get().to(handlers::github::callback)),
    )
    .service(
        web::resource(routes.login.as_str())
            .route(web::get().to(handlers::github::login_page)),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/auth/me")
            .wrap(AuthMiddleware::required())
            .route(web::get().to(handlers::users::me)),
    );
}

/// 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8888/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "provider": "GitHub",
            "session": "JWT"
        }
    }))
}
