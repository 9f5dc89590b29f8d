//! 에러 타입 모듈
//!
//! [`errors::AppError`]를 통해 저장소, OAuth, 설정 계층의 실패를 하나의 타입으로 다룹니다.

pub mod errors;

pub use errors::{AppError, AppResult, ErrorContext};
