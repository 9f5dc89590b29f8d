//! 영속 엔티티
//!
//! 세 엔티티 모두 GitHub 검증 콜백 안에서만 생성/수정되며 이 서비스가 삭제하지 않습니다.

pub mod users;
pub mod auths;
pub mod github;

pub use users::User;
pub use auths::Auth;
pub use github::{GithubCredential, GithubTokens};
