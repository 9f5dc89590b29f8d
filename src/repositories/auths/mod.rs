pub mod auth_repo;

pub use auth_repo::AuthRepository;
