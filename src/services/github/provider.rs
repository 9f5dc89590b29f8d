//! GitHub 프로바이더 시작 시퀀스
//!
//! 서로 독립적인 네 단계를 동시에 실행하고, 하나라도 실패하면 즉시 실패합니다.
//!
//! ```text
//! GithubProvider::start
//!   ├─ View::create(view_path)           뷰 템플릿 적재
//!   ├─ runtime.start(GitHub)             프로바이더 시작
//!   ├─ runtime.use_strategy(strategy)    전략 등록
//!   └─ GithubRoutes::from_callback_url   라우트 테이블 구성
//! ```
//!
//! 이미 끝난 단계는 되돌리지 않습니다. 실패하면 프로세스가 시작되지 않으므로
//! 부분적으로 등록된 런타임 상태는 사용되지 않습니다.

use std::sync::Arc;
use futures_util::future::try_join4;
use crate::config::{AuthProvider, GithubSettings};
use crate::errors::errors::AppError;
use crate::services::auth::AuthRuntime;
use crate::services::github::client::GithubApi;
use crate::services::github::reconciler::GithubReconciler;
use crate::services::github::strategy::GithubStrategy;
use crate::services::view::View;

pub const BEGIN_PATH: &str = "/auth/github";
pub const LOGIN_PATH: &str = "/auth/github/login";

/// GitHub 프로바이더가 노출하는 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRoutes {
    /// 핸드셰이크 시작 (`GET`)
    pub begin: String,
    /// 콜백 URL의 경로 부분 (`GET`)
    pub callback: String,
    /// 로그인 뷰 (`GET`)
    pub login: String,
}

impl GithubRoutes {
    /// 콜백 URL에서 경로를 뽑아 라우트 테이블을 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - URL 형식 오류, 경로가 `/`이거나 다른 라우트와 겹치는 경우
    pub fn from_callback_url(callback_url: &str) -> Result<Self, AppError> {
        let url = reqwest::Url::parse(callback_url).map_err(|e| {
            AppError::ConfigurationError(format!("GITHUB_CALLBACK_URL 형식이 올바르지 않습니다: {}", e))
        })?;

        let callback = url.path().trim_end_matches('/').to_string();

        if callback.is_empty() || callback == BEGIN_PATH || callback == LOGIN_PATH {
            return Err(AppError::ConfigurationError(format!(
                "GITHUB_CALLBACK_URL 경로를 콜백으로 쓸 수 없습니다: {}", url.path()
            )));
        }

        Ok(Self {
            begin: BEGIN_PATH.to_string(),
            callback,
            login: LOGIN_PATH.to_string(),
        })
    }
}

/// 시작이 끝난 GitHub 프로바이더
///
/// 핸들러는 `web::Data<GithubProvider>`로 설정, 뷰, 전략에 접근합니다.
pub struct GithubProvider {
    pub settings: GithubSettings,
    pub view: View,
    pub strategy: Arc<GithubStrategy>,
    pub routes: GithubRoutes,
}

impl GithubProvider {
    pub async fn start(
        settings: GithubSettings,
        runtime: Arc<AuthRuntime>,
        api: Arc<dyn GithubApi>,
        reconciler: Arc<GithubReconciler>,
    ) -> Result<Self, AppError> {
        let (view, (), strategy, routes) = try_join4(
            View::create(settings.view_path.clone()),
            runtime.start(AuthProvider::GitHub),
            Self::register_strategy(&runtime, api, reconciler),
            async { GithubRoutes::from_callback_url(&settings.callback_url) },
        )
        .await?;

        log::info!(
            "✅ GitHub 프로바이더 준비 완료: {} → {} (연결 모드: {:?})",
            routes.begin,
            routes.callback,
            settings.link_mode
        );

        Ok(Self {
            settings,
            view,
            strategy,
            routes,
        })
    }

    async fn register_strategy(
        runtime: &AuthRuntime,
        api: Arc<dyn GithubApi>,
        reconciler: Arc<GithubReconciler>,
    ) -> Result<Arc<GithubStrategy>, AppError> {
        let strategy = Arc::new(GithubStrategy::new(api, reconciler));
        runtime.use_strategy(strategy.clone()).await?;
        Ok(strategy)
    }

    pub fn reconciler(&self) -> &Arc<GithubReconciler> {
        self.strategy.reconciler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use chrono::Duration;
    use crate::config::{DuplicatePolicy, LinkMode};
    use crate::repositories::memory::{MemoryAuthStore, MemoryCredentialStore, MemoryUserStore};
    use crate::services::auth::OAuthStateSigner;
    use crate::services::github::fake::FakeGithubApi;

    fn view_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("github-provider-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("login.html"), "<a href=\"/auth/github\">Sign in</a>").unwrap();
        dir
    }

    fn reconciler() -> Arc<GithubReconciler> {
        Arc::new(GithubReconciler::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryAuthStore::new()),
            LinkMode::Auth,
            DuplicatePolicy::Reject,
        ))
    }

    fn runtime() -> Arc<AuthRuntime> {
        Arc::new(AuthRuntime::new(OAuthStateSigner::new("provider-secret", Duration::minutes(10))))
    }

    fn settings(view: &PathBuf) -> GithubSettings {
        let mut settings = GithubSettings::with_credentials("id", "secret");
        settings.view_path = view.to_string_lossy().to_string();
        settings
    }

    #[test]
    fn test_routes_from_callback_url() {
        let routes = GithubRoutes::from_callback_url("https://app.example.com/oauth/github/done/").unwrap();
        assert_eq!(routes.callback, "/oauth/github/done");
        assert_eq!(routes.begin, "/auth/github");

        assert!(GithubRoutes::from_callback_url("https://app.example.com/").is_err());
        assert!(GithubRoutes::from_callback_url("https://app.example.com/auth/github").is_err());
        assert!(GithubRoutes::from_callback_url("/relative/only").is_err());
    }

    #[actix_web::test]
    async fn test_start_registers_strategy_and_loads_view() {
        let dir = view_dir();
        let runtime = runtime();

        let provider = GithubProvider::start(settings(&dir), runtime.clone(), Arc::new(FakeGithubApi), reconciler())
            .await
            .unwrap();

        assert_eq!(provider.routes.callback, "/auth/github/callback");
        assert!(provider.view.render("login").is_ok());
        assert!(runtime.authenticate("github").unwrap().url.starts_with("https://github.test/"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[actix_web::test]
    async fn test_start_fails_fast_without_rollback() {
        let missing = std::env::temp_dir().join(format!("github-provider-missing-{}", uuid::Uuid::new_v4()));
        let runtime = runtime();

        let result = GithubProvider::start(settings(&missing), runtime.clone(), Arc::new(FakeGithubApi), reconciler()).await;
        assert!(matches!(result, Err(AppError::ConfigurationError(_))));

        // 다른 단계는 이미 끝났을 수 있고 되돌리지 않습니다.
        let again = GithubProvider::start(settings(&missing), runtime, Arc::new(FakeGithubApi), reconciler()).await;
        assert!(again.is_err());
    }

    #[actix_web::test]
    async fn test_second_start_on_same_runtime_fails() {
        let dir = view_dir();
        let runtime = runtime();

        GithubProvider::start(settings(&dir), runtime.clone(), Arc::new(FakeGithubApi), reconciler())
            .await
            .unwrap();
        let second = GithubProvider::start(settings(&dir), runtime, Arc::new(FakeGithubApi), reconciler()).await;

        assert!(matches!(second, Err(AppError::ConfigurationError(_))));
        fs::remove_dir_all(dir).unwrap();
    }
}
