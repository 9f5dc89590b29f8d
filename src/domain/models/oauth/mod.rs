pub mod github_profile;
pub mod oauth_state;

pub use github_profile::{GithubProfile, ProfileValue};
pub use oauth_state::{AuthIntent, OAuthStatePayload};
