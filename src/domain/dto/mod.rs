//! HTTP 요청/응답 DTO

pub mod auth;
pub mod users;

pub use auth::{CallbackOutcome, GithubCallbackQuery};
pub use users::{GithubLinkResponse, UserResponse};
