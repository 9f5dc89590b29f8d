//! 캐싱 계층 모듈
//!
//! MongoDB 사용자 조회 결과를 Redis에 캐싱합니다.
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
