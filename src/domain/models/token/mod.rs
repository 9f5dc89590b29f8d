pub mod token;

pub use token::{SessionToken, TokenClaims};
