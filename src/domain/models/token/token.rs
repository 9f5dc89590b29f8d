//! 세션 JWT 클레임
//!
//! GitHub 로그인에 성공하면 로컬 사용자에 대한 세션 토큰을 발급합니다.
//! 이 토큰이 "현재 요청의 로그인 사용자"를 결정합니다.

use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;

/// 세션 토큰 클레임
///
/// - `sub`: 로컬 사용자 ID
/// - `auth_provider`: 로그인에 사용한 프로바이더
/// - `roles`: 사용자 역할
/// - `iat` / `exp`: 발급/만료 시각 (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub auth_provider: AuthProvider,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// 발급된 세션 토큰
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}
