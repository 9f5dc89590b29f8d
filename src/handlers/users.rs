//! 현재 사용자 핸들러

use actix_web::{web, HttpResponse};
use crate::domain::dto::users::UserResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::github::GithubProvider;

/// 세션 사용자와 연결된 GitHub 계정
///
/// # Endpoint
/// `GET /auth/me` (세션 필수)
pub async fn me(
    session: AuthenticatedUser,
    provider: web::Data<GithubProvider>,
) -> Result<HttpResponse, AppError> {
    let reconciler = provider.reconciler();

    let user = reconciler.user(&session.user_id).await?;
    let credential = reconciler.linked_credential(&user).await?;

    let response = UserResponse::new(user, credential.as_ref().map(|c| &c.profile));
    Ok(HttpResponse::Ok().json(response))
}
