//! 도메인 계층
//!
//! - [`entities`] - 저장소에 보관되는 `User`, `Auth`, `GithubCredential`
//! - [`models`] - GitHub 프로필, 세션 클레임, OAuth state 등 저장되지 않는 모델
//! - [`dto`] - HTTP 요청/응답 형식

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::{Auth, GithubCredential, GithubTokens, User};
pub use dto::{CallbackOutcome, GithubCallbackQuery, GithubLinkResponse, UserResponse};
pub use models::{
    AuthIntent, AuthMode, AuthenticatedUser, GithubProfile, OAuthStatePayload, OptionalUser,
    ProfileValue, SessionToken, TokenClaims,
};
