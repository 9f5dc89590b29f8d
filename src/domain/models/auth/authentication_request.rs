/// 세션 미들웨어의 인증 모드
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMode {
    /// 유효한 세션 토큰이 없으면 401
    Required,
    /// 토큰이 있으면 검증하고, 없거나 무효하면 익명으로 통과
    Optional,
}
