use async_trait::async_trait;
use crate::config::AuthProvider;
use crate::domain::entities::User;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;

/// 인증 런타임에 등록되는 외부 인증 전략
///
/// 런타임은 state 발급/검증과 세션 상태 판정을 맡고, 전략은 프로바이더별 핸드셰이크와
/// 검증 콜백(로컬 사용자 결정)을 맡습니다.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// 라우트와 런타임 레지스트리에서 쓰는 이름 (예: `github`)
    fn name(&self) -> &'static str;

    fn provider(&self) -> AuthProvider;

    /// 서명된 `state`를 실은 외부 인가 페이지 URL
    fn authorization_url(&self, state: &str) -> String;

    /// 인가 코드를 토큰/프로필로 교환한 뒤 검증 콜백을 실행합니다.
    ///
    /// `session_user`가 있으면 계정 연결, 없으면 로그인입니다.
    async fn handle_callback(
        &self,
        code: &str,
        session_user: Option<&AuthenticatedUser>,
    ) -> Result<User, AppError>;
}
