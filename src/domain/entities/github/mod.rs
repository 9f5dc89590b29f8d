pub mod github_credential;

pub use github_credential::{GithubCredential, GithubTokens};
