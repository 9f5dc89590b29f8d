//! MongoDB 사용자 리포지토리
//!
//! [`UserRepository`](user_repo::UserRepository)는 `users` 컬렉션과 Redis 캐시를 사용하며
//! [`UserStore`](crate::repositories::stores::UserStore)를 구현합니다.

pub mod user_repo;

pub use user_repo::UserRepository;
