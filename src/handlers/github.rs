//! GitHub OAuth HTTP 핸들러
//!
//! 세 경로 모두 `GithubRoutes`에 정의된 경로로 등록됩니다.
//!
//! - `GET /auth/github` - 핸드셰이크 시작. 세션이 있으면 계정 연결, 없으면 로그인
//! - `GET {callback}` - 핸드셰이크 완료. 성공/실패 모두 리다이렉트로 응답
//! - `GET /auth/github/login` - 로그인 뷰
//!
//! 시작 시 state nonce를 짧게 유지되는 `github_oauth_state` 쿠키에 담고, 콜백은 이 쿠키가
//! state와 일치할 때만 진행합니다. 콜백 응답은 결과와 관계없이 이 쿠키를 지웁니다.
//!
//! 콜백 실패는 사용자에게 에러 본문 대신 실패 리다이렉트로 전달하고, 원인은 로그로만 남깁니다.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use crate::config::Environment;
use crate::domain::dto::auth::GithubCallbackQuery;
use crate::domain::entities::User;
use crate::domain::models::auth::OptionalUser;
use crate::domain::models::oauth::AuthIntent;
use crate::domain::models::token::SessionToken;
use crate::errors::errors::AppError;
use crate::services::auth::{AuthRuntime, TokenService, SESSION_COOKIE_NAME, STATE_COOKIE_NAME};
use crate::services::github::strategy::GITHUB_STRATEGY_NAME;
use crate::services::github::GithubProvider;

/// 핸드셰이크 시작
///
/// 로그인된 요청은 `authorize`(현재 사용자에 GitHub 연결),
/// 익명 요청은 `authenticate`(GitHub로 로그인)로 GitHub 인가 페이지에 보냅니다.
pub async fn begin(
    OptionalUser(session): OptionalUser,
    runtime: web::Data<AuthRuntime>,
    provider: web::Data<GithubProvider>,
) -> HttpResponse {
    let handshake = match &session {
        Some(user) => runtime.authorize(GITHUB_STRATEGY_NAME, user),
        None => runtime.authenticate(GITHUB_STRATEGY_NAME),
    };

    let handshake = match handshake {
        Ok(handshake) => handshake,
        Err(e) => {
            log::error!("GitHub 핸드셰이크 시작 실패: {}", e);
            return redirect(&provider.settings.failure_redirect);
        }
    };

    let cookie = state_cookie(
        &handshake.nonce,
        runtime.state_ttl().num_seconds(),
        Environment::current().requires_secure_cookies(),
    );

    HttpResponse::Found()
        .insert_header((header::LOCATION, handshake.url))
        .cookie(cookie)
        .finish()
}

/// 핸드셰이크 완료
///
/// 로그인 흐름이 성공하면 세션 쿠키를 발급하고, 연결 흐름은 기존 세션을 그대로 둡니다.
pub async fn callback(
    req: HttpRequest,
    query: web::Query<GithubCallbackQuery>,
    OptionalUser(session): OptionalUser,
    runtime: web::Data<AuthRuntime>,
    provider: web::Data<GithubProvider>,
) -> HttpResponse {
    let settings = &provider.settings;
    let browser_nonce = req.cookie(STATE_COOKIE_NAME).map(|c| c.value().to_string());

    let completion = match runtime
        .complete(
            GITHUB_STRATEGY_NAME,
            query.into_inner(),
            session.as_ref(),
            browser_nonce.as_deref(),
        )
        .await
    {
        Ok(completion) => completion,
        Err(e) => {
            log::warn!("GitHub 콜백 실패: {}", e);
            return finish_callback(&settings.failure_redirect, None);
        }
    };

    match completion.intent {
        AuthIntent::Authorize => finish_callback(&settings.success_redirect, None),
        AuthIntent::Authenticate => match establish_session(&completion.user) {
            Ok(cookie) => finish_callback(&settings.success_redirect, Some(cookie)),
            Err(e) => {
                log::error!("세션 발급 실패 - 사용자 {}: {}", completion.user.username, e);
                finish_callback(&settings.failure_redirect, None)
            }
        },
    }
}

/// 로그인 뷰
pub async fn login_page(provider: web::Data<GithubProvider>) -> Result<HttpResponse, AppError> {
    let html = provider.view.render("login")?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html.to_string()))
}

fn establish_session(user: &User) -> Result<Cookie<'static>, AppError> {
    let session = TokenService::instance().issue_session(user)?;
    Ok(session_cookie(&session, Environment::current().requires_secure_cookies()))
}

fn session_cookie(session: &SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME, session.access_token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(session.expires_in))
        .finish()
}

fn state_cookie(nonce: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(STATE_COOKIE_NAME, nonce.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// 콜백 응답. state 쿠키는 항상 지우고, 로그인에 성공했으면 세션 쿠키를 붙입니다.
fn finish_callback(location: &str, session: Option<Cookie<'static>>) -> HttpResponse {
    let mut expired_state = Cookie::build(STATE_COOKIE_NAME, "").path("/").finish();
    expired_state.make_removal();

    let mut response = HttpResponse::Found();
    response
        .insert_header((header::LOCATION, location))
        .cookie(expired_state);

    if let Some(session) = session {
        response.cookie(session);
    }
    response.finish()
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
