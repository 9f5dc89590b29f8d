//! 프로세스 메모리 저장소
//!
//! 재시작하면 내용이 사라집니다. GitHub 자격 증명은 운영 환경에서도 이 저장소를 사용하고,
//! 사용자/Auth 저장소는 `STORE_BACKEND=memory` 또는 테스트에서 사용합니다.

pub mod credential_store;
pub mod user_store;
pub mod auth_store;

pub use credential_store::MemoryCredentialStore;
pub use user_store::MemoryUserStore;
pub use auth_store::MemoryAuthStore;
