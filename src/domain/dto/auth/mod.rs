pub mod github_callback;

pub use github_callback::{CallbackOutcome, GithubCallbackQuery};
