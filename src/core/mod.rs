//! # Core Framework Module
//!
//! 싱글톤 의존성 주입 컨테이너([`registry::ServiceLocator`])를 제공합니다.
//!
//! ```rust,ignore
//! use crate::core::registry::ServiceLocator;
//!
//! ServiceLocator::set(database);
//! ServiceLocator::set(redis_client);
//! ServiceLocator::initialize_all().await?;
//!
//! let users = ServiceLocator::get::<UserRepository>();
//! ```

pub mod registry;

pub use registry::*;
