//! GitHub 신원 재조정
//!
//! OAuth 핸드셰이크가 끝난 뒤 받은 토큰과 프로필을 로컬 레코드에 반영합니다.
//!
//! ```text
//! 0. 세션 있음 (연결)       users.get(session) → 다른 사용자가 이 GitHub 신원을 점유했으면 Conflict
//!
//! 1. 자격 증명 upsert      credentials.get(profile.id)
//!                          ├─ NotFound → create
//!                          └─ Ok       → refresh + update
//!
//! 2. 세션 없음 (로그인)     direct: users.find(github = id)
//!                          auth:   auths.find(github = id) → users.find(auth = auth.id)
//!                          ├─ 0건 → 생성
//!                          ├─ 1건 → 사용
//!                          └─ N건 → DuplicatePolicy
//!
//! 3. 세션 있음 (연결)       현재 사용자에 자격 증명 연결 후 같은 사용자 반환
//! ```
//!
//! 0단계에서 거부된 연결은 자격 증명의 토큰도 건드리지 않습니다.
//!
//! 각 단계는 이전 단계의 결과를 받아 순차 실행되며, `NotFound`가 아닌 에러는 즉시 전파되어
//! 이후 단계는 실행되지 않습니다.

use std::sync::Arc;
use log::{info, warn};
use crate::config::{DuplicatePolicy, LinkMode};
use crate::domain::entities::{Auth, GithubCredential, GithubTokens, User};
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::oauth::GithubProfile;
use crate::errors::errors::AppError;
use crate::repositories::stores::{AuthStore, CredentialStore, UserQuery, UserStore};

pub struct GithubReconciler {
    credentials: Arc<dyn CredentialStore>,
    users: Arc<dyn UserStore>,
    auths: Arc<dyn AuthStore>,
    link_mode: LinkMode,
    duplicate_policy: DuplicatePolicy,
}

impl GithubReconciler {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        users: Arc<dyn UserStore>,
        auths: Arc<dyn AuthStore>,
        link_mode: LinkMode,
        duplicate_policy: DuplicatePolicy,
    ) -> Self {
        Self {
            credentials,
            users,
            auths,
            link_mode,
            duplicate_policy,
        }
    }

    /// 검증 콜백 본체
    ///
    /// `session_user`가 없으면 GitHub 신원으로 로그인할 사용자를 찾거나 만들고,
    /// 있으면 그 사용자에 GitHub 신원을 연결해서 같은 사용자를 돌려줍니다.
    pub async fn reconcile(
        &self,
        session_user: Option<&AuthenticatedUser>,
        tokens: GithubTokens,
        profile: GithubProfile,
    ) -> Result<User, AppError> {
        match session_user {
            None => {
                let credential = self.upsert_credential(tokens, profile).await?;
                self.login(&credential).await
            }
            Some(session) => {
                let user = self.users.get(&session.user_id).await?;
                self.ensure_linkable(&user, &profile.id).await?;

                let credential = self.upsert_credential(tokens, profile).await?;
                self.associate(user, &credential).await
            }
        }
    }

    /// 다른 사용자가 이미 이 GitHub 신원을 점유하고 있으면 `ConflictError`
    async fn ensure_linkable(&self, user: &User, credential_id: &str) -> Result<(), AppError> {
        let taken = || {
            warn!("GitHub {}는 다른 사용자에 연결되어 있어 {}에 연결할 수 없습니다", credential_id, user.username);
            AppError::ConflictError(format!("github {} is linked to another user", credential_id))
        };

        match self.link_mode {
            LinkMode::Direct => {
                let owners = self.users.find(UserQuery::Github(credential_id.to_string())).await?;
                if owners.iter().any(|owner| owner.id != user.id) {
                    return Err(taken());
                }
            }
            LinkMode::Auth => {
                for auth in self.auths.find_by_github(credential_id).await? {
                    let Some(auth_id) = auth.id else { continue };
                    if user.auth == Some(auth_id) {
                        continue;
                    }

                    let owners = self.users.find(UserQuery::Auth(auth_id)).await?;
                    if owners.iter().any(|owner| owner.id != user.id) {
                        return Err(taken());
                    }

                    // 사용자의 Auth가 살아 있으면 그 Auth를 옮겨야 하는데, 이 바인딩과 충돌합니다.
                    if let Some(own) = user.auth {
                        match self.auths.get(&own.to_hex()).await {
                            Ok(_) => return Err(taken()),
                            Err(AppError::NotFound(_)) => {}
                            Err(e) => return Err(e),
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn upsert_credential(
        &self,
        tokens: GithubTokens,
        profile: GithubProfile,
    ) -> Result<GithubCredential, AppError> {
        match self.credentials.get(&profile.id).await {
            Ok(existing) => self.refresh_credential(existing, tokens, profile).await,
            Err(AppError::NotFound(_)) => {
                let credential = GithubCredential::new(profile.clone(), tokens.clone());

                match self.credentials.create(credential).await {
                    Ok(created) => {
                        info!("🆕 GitHub 자격 증명 생성: {} ({})", created.id, created.profile.username);
                        Ok(created)
                    }
                    Err(AppError::ConflictError(_)) => {
                        warn!("GitHub 자격 증명 동시 생성 감지, 기존 레코드 갱신: {}", profile.id);
                        let existing = self.credentials.get(&profile.id).await?;
                        self.refresh_credential(existing, tokens, profile).await
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn refresh_credential(
        &self,
        mut credential: GithubCredential,
        tokens: GithubTokens,
        profile: GithubProfile,
    ) -> Result<GithubCredential, AppError> {
        credential.refresh(profile, tokens);
        let updated = self.credentials.update(credential).await?;
        info!("🔄 GitHub 자격 증명 갱신: {}", updated.id);
        Ok(updated)
    }

    async fn login(&self, credential: &GithubCredential) -> Result<User, AppError> {
        let query = match self.link_mode {
            LinkMode::Direct => UserQuery::Github(credential.id.clone()),
            LinkMode::Auth => {
                let auth = self.find_or_create_auth(credential).await?;
                UserQuery::Auth(auth.id.ok_or_else(|| {
                    AppError::InternalError("저장된 Auth에 ID가 없습니다".to_string())
                })?)
            }
        };

        let mut user = self.find_or_create_user(query, &credential.profile).await?;

        user.mark_login();
        let user = self.users.save(user).await?;

        info!("✅ GitHub 로그인: 사용자 {} ← github {}", user.username, credential.id);
        Ok(user)
    }

    async fn find_or_create_user(&self, query: UserQuery, profile: &GithubProfile) -> Result<User, AppError> {
        let found = self.users.find(query.clone()).await?;
        if let Some(user) = self.pick(found, "user", &profile.id)? {
            return Ok(user);
        }

        let mut user = User::from_github_profile(profile);
        match &query {
            UserQuery::Github(credential_id) => user.link_github(credential_id),
            UserQuery::Auth(auth_id) => user.link_auth(*auth_id),
        }

        match self.users.create(user).await {
            Ok(created) => {
                info!("🆕 사용자 생성: {} (github {})", created.username, profile.id);
                Ok(created)
            }
            Err(AppError::ConflictError(message)) => {
                warn!("사용자 동시 생성 감지, 재조회: github {}", profile.id);
                let found = self.users.find(query).await?;
                self.pick(found, "user", &profile.id)?
                    .ok_or(AppError::ConflictError(message))
            }
            Err(e) => Err(e),
        }
    }

    async fn find_or_create_auth(&self, credential: &GithubCredential) -> Result<Auth, AppError> {
        let found = self.auths.find_by_github(&credential.id).await?;
        if let Some(auth) = self.pick(found, "auth", &credential.id)? {
            return Ok(auth);
        }

        match self.auths.create(Auth::for_github(&credential.id)).await {
            Ok(created) => {
                info!("🆕 Auth 바인딩 생성: github {}", credential.id);
                Ok(created)
            }
            Err(AppError::ConflictError(message)) => {
                warn!("Auth 바인딩 동시 생성 감지, 재조회: github {}", credential.id);
                let found = self.auths.find_by_github(&credential.id).await?;
                self.pick(found, "auth", &credential.id)?
                    .ok_or(AppError::ConflictError(message))
            }
            Err(e) => Err(e),
        }
    }

    /// 조회 결과 0/1/N건 처리
    fn pick<T>(&self, mut records: Vec<T>, kind: &str, credential_id: &str) -> Result<Option<T>, AppError> {
        match records.len() {
            0 => Ok(None),
            1 => Ok(records.pop()),
            count => {
                warn!("⚠️ GitHub {}에 연결된 {} 레코드가 {}개입니다", credential_id, kind, count);

                match self.duplicate_policy {
                    DuplicatePolicy::Reject => Err(AppError::ConflictError(format!(
                        "github {} is linked to {} {} records",
                        credential_id, count, kind
                    ))),
                    DuplicatePolicy::FirstMatch => Ok(Some(records.swap_remove(0))),
                }
            }
        }
    }

    /// 로그인된 사용자에 자격 증명을 연결합니다.
    ///
    /// 점유 확인 이후에 다른 요청이 먼저 연결한 경우에는 저장소의 유니크 제약으로
    /// `ConflictError`가 발생하며, 아무것도 병합하지 않습니다.
    async fn associate(&self, mut user: User, credential: &GithubCredential) -> Result<User, AppError> {
        match self.link_mode {
            LinkMode::Direct => {
                if user.github.as_deref() == Some(credential.id.as_str()) {
                    return Ok(user);
                }
                user.link_github(&credential.id);
            }
            LinkMode::Auth => {
                if let Some(auth_id) = user.auth {
                    match self.auths.get(&auth_id.to_hex()).await {
                        Ok(mut auth) => {
                            if auth.github.as_deref() != Some(credential.id.as_str()) {
                                auth.link_github(&credential.id);
                                self.auths.save(auth).await?;
                            }
                            info!("🔗 GitHub 연결: 사용자 {} ← github {}", user.username, credential.id);
                            return Ok(user);
                        }
                        Err(AppError::NotFound(_)) => {
                            warn!("사용자 {}의 Auth {}가 없습니다. 새로 연결합니다", user.username, auth_id);
                        }
                        Err(e) => return Err(e),
                    }
                }

                let auth = self.find_or_create_auth(credential).await?;
                user.link_auth(auth.id.ok_or_else(|| {
                    AppError::InternalError("저장된 Auth에 ID가 없습니다".to_string())
                })?);
            }
        }

        let user = self.users.save(user).await?;
        info!("🔗 GitHub 연결: 사용자 {} ← github {}", user.username, credential.id);
        Ok(user)
    }

    /// 사용자와 연결된 GitHub 자격 증명 (연결이 없거나 끊겨 있으면 None)
    pub async fn linked_credential(&self, user: &User) -> Result<Option<GithubCredential>, AppError> {
        let credential_id = match self.link_mode {
            LinkMode::Direct => user.github.clone(),
            LinkMode::Auth => match user.auth {
                Some(auth_id) => match self.auths.get(&auth_id.to_hex()).await {
                    Ok(auth) => auth.github,
                    Err(AppError::NotFound(_)) => None,
                    Err(e) => return Err(e),
                },
                None => None,
            },
        };

        let Some(credential_id) = credential_id else {
            return Ok(None);
        };

        match self.credentials.get(&credential_id).await {
            Ok(credential) => Ok(Some(credential)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn user(&self, user_id: &str) -> Result<User, AppError> {
        self.users.get(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;
    use crate::config::AuthProvider;
    use crate::repositories::memory::{MemoryAuthStore, MemoryCredentialStore, MemoryUserStore};

    struct Fixture {
        credentials: Arc<MemoryCredentialStore>,
        users: Arc<MemoryUserStore>,
        auths: Arc<MemoryAuthStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                credentials: Arc::new(MemoryCredentialStore::new()),
                users: Arc::new(MemoryUserStore::new()),
                auths: Arc::new(MemoryAuthStore::new()),
            }
        }

        fn reconciler(&self, link_mode: LinkMode, duplicate_policy: DuplicatePolicy) -> GithubReconciler {
            GithubReconciler::new(
                self.credentials.clone(),
                self.users.clone(),
                self.auths.clone(),
                link_mode,
                duplicate_policy,
            )
        }
    }

    /// 모든 조회가 NotFound가 아닌 에러로 실패하는 자격 증명 저장소
    struct BrokenCredentialStore;

    #[async_trait]
    impl CredentialStore for BrokenCredentialStore {
        async fn get(&self, _id: &str) -> Result<GithubCredential, AppError> {
            Err(AppError::DatabaseError("connection reset".to_string()))
        }

        async fn create(&self, _credential: GithubCredential) -> Result<GithubCredential, AppError> {
            panic!("create must not run after a failed lookup");
        }

        async fn update(&self, _credential: GithubCredential) -> Result<GithubCredential, AppError> {
            panic!("update must not run after a failed lookup");
        }
    }

    /// 첫 조회만 비어 있는 것처럼 응답하는 저장소 래퍼
    ///
    /// 다른 요청이 조회와 생성 사이에 먼저 레코드를 만든 상황을 재현합니다.
    struct StaleFirstRead<S> {
        inner: Arc<S>,
        missed: AtomicBool,
    }

    impl<S> StaleFirstRead<S> {
        fn new(inner: Arc<S>) -> Arc<Self> {
            Arc::new(Self { inner, missed: AtomicBool::new(false) })
        }

        fn first_read(&self) -> bool {
            !self.missed.swap(true, Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialStore for StaleFirstRead<MemoryCredentialStore> {
        async fn get(&self, id: &str) -> Result<GithubCredential, AppError> {
            if self.first_read() {
                return Err(AppError::NotFound(id.to_string()));
            }
            self.inner.get(id).await
        }

        async fn create(&self, credential: GithubCredential) -> Result<GithubCredential, AppError> {
            self.inner.create(credential).await
        }

        async fn update(&self, credential: GithubCredential) -> Result<GithubCredential, AppError> {
            self.inner.update(credential).await
        }
    }

    #[async_trait]
    impl UserStore for StaleFirstRead<MemoryUserStore> {
        async fn get(&self, id: &str) -> Result<User, AppError> {
            self.inner.get(id).await
        }

        async fn find(&self, query: UserQuery) -> Result<Vec<User>, AppError> {
            if self.first_read() {
                return Ok(vec![]);
            }
            self.inner.find(query).await
        }

        async fn create(&self, user: User) -> Result<User, AppError> {
            self.inner.create(user).await
        }

        async fn save(&self, user: User) -> Result<User, AppError> {
            self.inner.save(user).await
        }
    }

    #[async_trait]
    impl AuthStore for StaleFirstRead<MemoryAuthStore> {
        async fn get(&self, id: &str) -> Result<Auth, AppError> {
            self.inner.get(id).await
        }

        async fn find_by_github(&self, credential_id: &str) -> Result<Vec<Auth>, AppError> {
            if self.first_read() {
                return Ok(vec![]);
            }
            self.inner.find_by_github(credential_id).await
        }

        async fn create(&self, auth: Auth) -> Result<Auth, AppError> {
            self.inner.create(auth).await
        }

        async fn save(&self, auth: Auth) -> Result<Auth, AppError> {
            self.inner.save(auth).await
        }
    }

    fn profile(id: u64, login: &str) -> GithubProfile {
        GithubProfile::from_api(json!({ "id": id, "login": login, "name": login })).unwrap()
    }

    fn tokens(access: &str) -> GithubTokens {
        GithubTokens { access_token: access.to_string(), refresh_token: Some(format!("{}-refresh", access)) }
    }

    fn session(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user.id_string().unwrap(),
            auth_provider: AuthProvider::GitHub,
            roles: user.roles.clone(),
        }
    }

    #[actix_web::test]
    async fn test_first_login_creates_credential_auth_and_user() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Auth, DuplicatePolicy::Reject);

        let user = reconciler.reconcile(None, tokens("a"), profile(12345, "octocat")).await.unwrap();

        assert_eq!(fx.credentials.len(), 1);
        assert_eq!(fx.users.all(), vec![user.clone()]);
        let auths = fx.auths.all();
        assert_eq!(auths.len(), 1);
        assert_eq!(auths[0].github.as_deref(), Some("12345"));
        assert_eq!(user.auth, auths[0].id);
        assert_eq!(user.github, None);
    }

    #[actix_web::test]
    async fn test_first_login_direct_mode_links_user() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Direct, DuplicatePolicy::Reject);

        let user = reconciler.reconcile(None, tokens("a"), profile(12345, "octocat")).await.unwrap();

        assert_eq!(user.github.as_deref(), Some("12345"));
        assert_eq!(fx.users.all().len(), 1);
        assert!(fx.auths.all().is_empty());
    }

    #[actix_web::test]
    async fn test_repeat_login_reuses_user_and_refreshes_credential() {
        for mode in [LinkMode::Auth, LinkMode::Direct] {
            let fx = Fixture::new();
            let reconciler = fx.reconciler(mode, DuplicatePolicy::Reject);

            let first = reconciler.reconcile(None, tokens("first"), profile(12345, "octocat")).await.unwrap();
            let second = reconciler.reconcile(None, tokens("second"), profile(12345, "octocat-renamed")).await.unwrap();

            assert_eq!(first.id, second.id);
            assert_eq!(fx.users.all().len(), 1);
            assert_eq!(fx.credentials.len(), 1);

            let credential = fx.credentials.get("12345").await.unwrap();
            assert_eq!(credential.credentials.access_token, "second");
            assert_eq!(credential.profile.username, "octocat-renamed");
        }
    }

    #[actix_web::test]
    async fn test_logged_in_association_keeps_session_user() {
        for mode in [LinkMode::Auth, LinkMode::Direct] {
            let fx = Fixture::new();
            let reconciler = fx.reconciler(mode, DuplicatePolicy::Reject);

            let existing = reconciler.reconcile(None, tokens("a"), profile(1, "first")).await.unwrap();
            let linked = reconciler
                .reconcile(Some(&session(&existing)), tokens("b"), profile(2, "second"))
                .await
                .unwrap();

            assert_eq!(linked.id, existing.id);
            assert_eq!(fx.users.all().len(), 1);

            let credential = reconciler.linked_credential(&linked).await.unwrap().unwrap();
            assert_eq!(credential.id, "2");
        }
    }

    #[actix_web::test]
    async fn test_association_without_auth_creates_binding() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Auth, DuplicatePolicy::Reject);
        let local = fx.users.insert_unchecked(User::from_github_profile(&profile(99, "local")));

        let linked = reconciler
            .reconcile(Some(&session(&local)), tokens("a"), profile(12345, "octocat"))
            .await
            .unwrap();

        assert_eq!(linked.id, local.id);
        let auths = fx.auths.all();
        assert_eq!(auths.len(), 1);
        assert_eq!(linked.auth, auths[0].id);
    }

    #[actix_web::test]
    async fn test_association_conflicts_when_credential_owned_by_other_user() {
        for mode in [LinkMode::Direct, LinkMode::Auth] {
            let fx = Fixture::new();
            let reconciler = fx.reconciler(mode, DuplicatePolicy::Reject);

            reconciler.reconcile(None, tokens("a"), profile(12345, "owner")).await.unwrap();
            let other = fx.users.insert_unchecked(User::from_github_profile(&profile(7, "other")));

            let result = reconciler
                .reconcile(Some(&session(&other)), tokens("b"), profile(12345, "owner"))
                .await;

            assert!(matches!(result, Err(AppError::ConflictError(_))));

            let stored = fx.users.get(&other.id_string().unwrap()).await.unwrap();
            assert_eq!(stored.github, None);
            assert_eq!(stored.auth, None);

            let credential = fx.credentials.get("12345").await.unwrap();
            assert_eq!(credential.credentials.access_token, "a");
        }
    }

    #[actix_web::test]
    async fn test_association_conflicts_when_session_user_has_other_binding() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Auth, DuplicatePolicy::Reject);

        fx.auths.insert_unchecked(Auth::for_github("12345"));
        let other = reconciler.reconcile(None, tokens("x"), profile(7, "other")).await.unwrap();

        let result = reconciler
            .reconcile(Some(&session(&other)), tokens("b"), profile(12345, "owner"))
            .await;

        assert!(matches!(result, Err(AppError::ConflictError(_))));
        assert!(fx.credentials.get("12345").await.unwrap_err().is_not_found());
    }

    #[actix_web::test]
    async fn test_relinking_own_credential_refreshes_tokens() {
        for mode in [LinkMode::Direct, LinkMode::Auth] {
            let fx = Fixture::new();
            let reconciler = fx.reconciler(mode, DuplicatePolicy::Reject);

            let owner = reconciler.reconcile(None, tokens("a"), profile(12345, "owner")).await.unwrap();
            let linked = reconciler
                .reconcile(Some(&session(&owner)), tokens("b"), profile(12345, "owner"))
                .await
                .unwrap();

            assert_eq!(linked.id, owner.id);
            let credential = fx.credentials.get("12345").await.unwrap();
            assert_eq!(credential.credentials.access_token, "b");
        }
    }

    #[actix_web::test]
    async fn test_concurrent_credential_create_refreshes_winner() {
        let fx = Fixture::new();
        let winner = fx
            .reconciler(LinkMode::Direct, DuplicatePolicy::Reject)
            .reconcile(None, tokens("winner"), profile(12345, "octocat"))
            .await
            .unwrap();

        let late = GithubReconciler::new(
            StaleFirstRead::new(fx.credentials.clone()),
            fx.users.clone(),
            fx.auths.clone(),
            LinkMode::Direct,
            DuplicatePolicy::Reject,
        );
        let user = late.reconcile(None, tokens("late"), profile(12345, "octocat")).await.unwrap();

        assert_eq!(user.id, winner.id);
        assert_eq!(fx.credentials.len(), 1);
        assert_eq!(fx.users.all().len(), 1);
        assert_eq!(fx.credentials.get("12345").await.unwrap().credentials.access_token, "late");
    }

    #[actix_web::test]
    async fn test_concurrent_user_create_returns_winner_direct_mode() {
        let fx = Fixture::new();
        let winner = fx
            .reconciler(LinkMode::Direct, DuplicatePolicy::Reject)
            .reconcile(None, tokens("a"), profile(12345, "octocat"))
            .await
            .unwrap();

        let late = GithubReconciler::new(
            fx.credentials.clone(),
            StaleFirstRead::new(fx.users.clone()),
            fx.auths.clone(),
            LinkMode::Direct,
            DuplicatePolicy::Reject,
        );
        let user = late.reconcile(None, tokens("b"), profile(12345, "octocat")).await.unwrap();

        assert_eq!(user.id, winner.id);
        assert_eq!(fx.users.all().len(), 1);
        assert!(fx.auths.all().is_empty());
    }

    #[actix_web::test]
    async fn test_concurrent_auth_create_returns_winner_auth_mode() {
        let fx = Fixture::new();
        let winner = fx
            .reconciler(LinkMode::Auth, DuplicatePolicy::Reject)
            .reconcile(None, tokens("a"), profile(12345, "octocat"))
            .await
            .unwrap();

        let late = GithubReconciler::new(
            fx.credentials.clone(),
            fx.users.clone(),
            StaleFirstRead::new(fx.auths.clone()),
            LinkMode::Auth,
            DuplicatePolicy::Reject,
        );
        let user = late.reconcile(None, tokens("b"), profile(12345, "octocat")).await.unwrap();

        assert_eq!(user.id, winner.id);
        assert_eq!(user.auth, winner.auth);
        assert_eq!(fx.auths.all().len(), 1);
        assert_eq!(fx.users.all().len(), 1);
    }

    #[actix_web::test]
    async fn test_association_with_unknown_session_user_fails() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Auth, DuplicatePolicy::Reject);
        let ghost = AuthenticatedUser {
            user_id: ObjectId::new().to_hex(),
            auth_provider: AuthProvider::GitHub,
            roles: vec![],
        };

        let result = reconciler.reconcile(Some(&ghost), tokens("a"), profile(1, "x")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_lookup_failure_aborts_without_creating_records() {
        let fx = Fixture::new();
        let reconciler = GithubReconciler::new(
            Arc::new(BrokenCredentialStore),
            fx.users.clone(),
            fx.auths.clone(),
            LinkMode::Auth,
            DuplicatePolicy::Reject,
        );

        let result = reconciler.reconcile(None, tokens("a"), profile(12345, "octocat")).await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert!(fx.users.all().is_empty());
        assert!(fx.auths.all().is_empty());
    }

    #[actix_web::test]
    async fn test_duplicate_users_rejected_by_default() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Direct, DuplicatePolicy::Reject);

        for login in ["dup-a", "dup-b"] {
            let mut user = User::from_github_profile(&profile(12345, login));
            user.link_github("12345");
            fx.users.insert_unchecked(user);
        }

        let result = reconciler.reconcile(None, tokens("a"), profile(12345, "octocat")).await;

        assert!(matches!(result, Err(AppError::ConflictError(_))));
        assert_eq!(fx.users.all().len(), 2);
    }

    #[actix_web::test]
    async fn test_duplicate_auths_first_match_policy() {
        let fx = Fixture::new();
        let reconciler = fx.reconciler(LinkMode::Auth, DuplicatePolicy::FirstMatch);

        let first = fx.auths.insert_unchecked(Auth::for_github("12345"));
        fx.auths.insert_unchecked(Auth::for_github("12345"));

        let user = reconciler.reconcile(None, tokens("a"), profile(12345, "octocat")).await.unwrap();

        assert_eq!(user.auth, first.id);
        assert_eq!(fx.auths.all().len(), 2);
    }
}
