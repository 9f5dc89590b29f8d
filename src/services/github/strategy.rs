use std::sync::Arc;
use async_trait::async_trait;
use crate::config::AuthProvider;
use crate::domain::entities::{GithubTokens, User};
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::oauth::GithubProfile;
use crate::errors::errors::AppError;
use crate::services::auth::strategy::Strategy;
use crate::services::github::client::GithubApi;
use crate::services::github::reconciler::GithubReconciler;

pub const GITHUB_STRATEGY_NAME: &str = "github";

/// GitHub 인증 전략
///
/// 핸드셰이크는 [`GithubApi`]에, 로컬 사용자 결정은 [`GithubReconciler`]에 위임합니다.
pub struct GithubStrategy {
    api: Arc<dyn GithubApi>,
    reconciler: Arc<GithubReconciler>,
}

impl GithubStrategy {
    pub fn new(api: Arc<dyn GithubApi>, reconciler: Arc<GithubReconciler>) -> Self {
        Self { api, reconciler }
    }

    pub fn reconciler(&self) -> &Arc<GithubReconciler> {
        &self.reconciler
    }

    /// 검증 콜백: 토큰과 프로필을 받아 로컬 사용자를 결정합니다.
    pub async fn verify(
        &self,
        session_user: Option<&AuthenticatedUser>,
        tokens: GithubTokens,
        profile: GithubProfile,
    ) -> Result<User, AppError> {
        self.reconciler.reconcile(session_user, tokens, profile).await
    }
}

#[async_trait]
impl Strategy for GithubStrategy {
    fn name(&self) -> &'static str {
        GITHUB_STRATEGY_NAME
    }

    fn provider(&self) -> AuthProvider {
        AuthProvider::GitHub
    }

    fn authorization_url(&self, state: &str) -> String {
        self.api.authorize_url(state)
    }

    async fn handle_callback(
        &self,
        code: &str,
        session_user: Option<&AuthenticatedUser>,
    ) -> Result<User, AppError> {
        let tokens = self.api.exchange_code(code).await?;
        let profile = self.api.fetch_profile(&tokens.access_token).await?;

        log::debug!("GitHub 프로필 수신: {} ({})", profile.username, profile.id);

        self.verify(session_user, tokens, profile).await
    }
}
