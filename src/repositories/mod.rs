//! 데이터 액세스 계층
//!
//! 재조정 로직은 [`stores`]의 trait 객체(`CredentialStore`, `UserStore`, `AuthStore`)만 사용합니다.
//!
//! - [`memory`] - 프로세스 메모리 저장소 (GitHub 자격 증명은 항상 여기에 보관)
//! - [`users`], [`auths`] - `#[repository]` 매크로로 관리되는 MongoDB 리포지토리
//!
//! ```rust,ignore
//! use crate::core::registry::ServiceLocator;
//! use crate::repositories::users::UserRepository;
//!
//! let user_repo = ServiceLocator::get::<UserRepository>();
//! user_repo.create_indexes().await?;
//! ```

pub mod stores;
pub mod memory;
pub mod users;
pub mod auths;

pub use stores::{AuthStore, CredentialStore, UserQuery, UserStore};
