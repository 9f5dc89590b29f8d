//! 저장되지 않는 도메인 모델

pub mod auth;
pub mod oauth;
pub mod token;

pub use auth::{AuthMode, AuthenticatedUser, OptionalUser};
pub use oauth::{AuthIntent, GithubProfile, OAuthStatePayload, ProfileValue};
pub use token::{SessionToken, TokenClaims};
