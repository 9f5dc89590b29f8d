//! # Service Registry
//!
//! `#[service]` / `#[repository]` 매크로가 생성한 싱글톤을 보관하는 의존성 주입 컨테이너입니다.
//!
//! ## 동작 방식
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ #[service]    → ServiceRegistration 생성
//!    ├─ #[repository] → RepositoryRegistration 생성
//!    └─ inventory::collect! → 전역 레지스트리에 수집
//!
//! 2. 런타임 (main)
//!    ├─ Database, RedisClient 등 인프라 컴포넌트를 ServiceLocator::set()으로 등록
//!    └─ ServiceLocator::initialize_all() → 리포지토리, 서비스 순서로 생성
//!
//! 3. 조회
//!    └─ ServiceLocator::get::<T>() → 캐시 확인 → 등록 정보로 생성 → 캐시 저장
//! ```
//!
//! GitHub 전략과 재조정 로직은 저장소 trait 객체를 받으므로 이 컨테이너를 거치지 않고
//! 시작 단계에서 직접 조립됩니다. 컨테이너는 Mongo 리포지토리와 토큰 서비스만 관리합니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;

/// 비즈니스 로직 서비스를 위한 공통 인터페이스
///
/// `#[service]` 매크로가 적용된 구조체가 이 trait을 자동 구현합니다.
#[async_trait]
pub trait Service: Send + Sync {
    /// 레지스트리에서 서비스를 식별하는 이름
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 데이터 액세스 리포지토리를 위한 공통 인터페이스
///
/// `#[repository]` 매크로가 적용된 구조체가 이 trait을 자동 구현합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션 이름
    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 서비스 등록 정보 (`#[service]` 매크로가 생성)
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// 리포지토리 등록 정보 (`#[repository]` 매크로가 생성)
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (clean_registration_name(registration.name), registration))
        .collect();

    log::debug!("Service 이름 캐시 구성: {}개", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|registration| (clean_registration_name(registration.name), registration))
        .collect();

    log::debug!("Repository 이름 캐시 구성: {}개", cache.len());
    cache
});

/// `user_repository`, `token_service` 같은 등록 이름을 `user`, `token`으로 정규화합니다.
fn clean_registration_name(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// `a::b::UserRepository` → `UserRepository`
fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 싱글톤 의존성 주입 컨테이너
pub struct ServiceLocator {
    /// `TypeId`별 인스턴스 캐시
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// 생성 중인 타입 (순환 참조 감지용)
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    fn cached<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR.instances.read().unwrap_or_else(|e| e.into_inner());
        instances
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 지정된 타입의 싱글톤 인스턴스를 가져옵니다.
    ///
    /// 캐시에 없으면 타입 이름의 `Repository` / `Service` 접미사로 등록 정보를 찾아 생성합니다.
    /// 생성자는 잠금 밖에서 호출되므로 생성자 내부에서 다른 의존성을 조회해도 안전합니다.
    ///
    /// # Panics
    ///
    /// * 등록되지 않은 타입을 요청한 경우
    /// * 순환 의존성이 감지된 경우
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        if let Some(instance) = Self::cached::<T>() {
            return instance;
        }

        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        {
            let mut initializing = LOCATOR.initializing.write().unwrap_or_else(|e| e.into_inner());
            if !initializing.insert(type_id) {
                log::error!("❌ 순환 의존성 감지: {}", type_name);
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        let created = std::panic::catch_unwind(Self::construct::<T>);

        LOCATOR.initializing
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&type_id);

        let instance = match created {
            Ok(instance) => instance,
            Err(_) => panic!("Failed to create instance for {}", type_name),
        };

        let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance as Arc<dyn Any + Send + Sync>)
            .clone();

        stored
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("Type mismatch in ServiceLocator for {}", type_name))
    }

    fn construct<T: 'static + Send + Sync>() -> Arc<T> {
        let type_name = std::any::type_name::<T>();
        let short_name = short_type_name(type_name);

        let boxed = if let Some(entity) = short_name.strip_suffix("Repository") {
            let registration = REPOSITORY_NAME_CACHE
                .get(&entity.to_lowercase())
                .unwrap_or_else(|| panic!("No repository found for entity: {}", entity));
            (registration.constructor)()
        } else if let Some(entity) = short_name.strip_suffix("Service") {
            let registration = SERVICE_NAME_CACHE
                .get(&entity.to_lowercase())
                .unwrap_or_else(|| panic!("No service found for entity: {}", entity));
            (registration.constructor)()
        } else {
            panic!(
                "Service not found: {}. Register it with #[service] / #[repository] or ServiceLocator::set()",
                type_name
            );
        };

        match boxed.downcast::<Arc<T>>() {
            Ok(instance) => (*instance).clone(),
            Err(_) => panic!("Type mismatch for registration: {}", short_name),
        }
    }

    /// 외부에서 생성한 인스턴스(Database, RedisClient 등)를 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", short_type_name(type_name));

        let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 수집된 모든 리포지토리와 서비스를 생성합니다.
    ///
    /// 리포지토리를 먼저 생성하여 서비스가 주입받을 인스턴스를 미리 준비합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        let mut repo_count = 0;
        for registration in inventory::iter::<RepositoryRegistration>() {
            let _instance = (registration.constructor)();
            log::info!("  ✓ repository {}", registration.name);
            repo_count += 1;
        }

        let mut service_count = 0;
        for registration in inventory::iter::<ServiceRegistration>() {
            let _instance = (registration.constructor)();
            log::info!("  ✓ service {}", registration.name);
            service_count += 1;
        }

        log::info!("🔄 레지스트리 초기화 완료: repository {}개, service {}개", repo_count, service_count);
        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);
