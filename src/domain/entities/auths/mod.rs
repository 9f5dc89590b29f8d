pub mod auth;

pub use auth::Auth;
