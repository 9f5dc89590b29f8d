//! GitHub 인증 서비스 메인 애플리케이션
//!
//! 설정을 읽고 저장소와 GitHub 프로바이더를 조립한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use github_auth_service::caching::redis::RedisClient;
use github_auth_service::config::{GithubSettings, RateLimitConfig, ServerConfig, StoreBackend};
use github_auth_service::core::registry::ServiceLocator;
use github_auth_service::db::Database;
use github_auth_service::errors::{AppError, ErrorContext};
use github_auth_service::repositories::auths::AuthRepository;
use github_auth_service::repositories::memory::{MemoryAuthStore, MemoryCredentialStore, MemoryUserStore};
use github_auth_service::repositories::stores::{AuthStore, UserStore};
use github_auth_service::repositories::users::UserRepository;
use github_auth_service::routes::configure_all_routes;
use github_auth_service::services::auth::{AuthRuntime, OAuthStateSigner};
use github_auth_service::services::github::{GithubHttpClient, GithubProvider, GithubReconciler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 GitHub 인증 서비스 시작중...");

    let (runtime, provider) = bootstrap().await.map_err(|e| {
        error!("❌ 서비스 시작 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(runtime, provider).await
}

/// 저장소, GitHub 클라이언트, 인증 런타임을 조립하고 프로바이더를 시작합니다.
///
/// # Errors
///
/// * `AppError::ConfigurationError` - GitHub 자격 증명 누락, URL 형식 오류, 뷰 디렉터리 없음
/// * `AppError::DatabaseError` / `AppError::RedisError` - 저장소 연결 실패
async fn bootstrap() -> Result<(Arc<AuthRuntime>, GithubProvider), AppError> {
    let settings = GithubSettings::from_env()?;
    let (users, auths) = initialize_stores(StoreBackend::from_env()).await?;

    // 자격 증명은 백엔드와 관계없이 프로세스 메모리에만 둡니다.
    let reconciler = Arc::new(GithubReconciler::new(
        Arc::new(MemoryCredentialStore::new()),
        users,
        auths,
        settings.link_mode,
        settings.duplicate_policy,
    ));

    let api = Arc::new(GithubHttpClient::new(&settings)?);
    let runtime = Arc::new(AuthRuntime::new(OAuthStateSigner::from_env()));

    let provider = GithubProvider::start(settings, runtime.clone(), api, reconciler).await?;

    Ok((runtime, provider))
}

/// `STORE_BACKEND`에 따라 사용자/Auth 저장소를 준비합니다.
async fn initialize_stores(
    backend: StoreBackend,
) -> Result<(Arc<dyn UserStore>, Arc<dyn AuthStore>), AppError> {
    match backend {
        StoreBackend::Memory => {
            warn!("⚠️ 메모리 저장소 사용: 재시작하면 사용자 데이터가 사라집니다");

            let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
            let auths: Arc<dyn AuthStore> = Arc::new(MemoryAuthStore::new());
            Ok((users, auths))
        }
        StoreBackend::Mongo => {
            let (database, redis_client) = initialize_data_stores().await?;

            // ServiceLocator에 핵심 인프라 등록 후 리포지토리 생성
            ServiceLocator::set(database);
            ServiceLocator::set(redis_client);

            ServiceLocator::initialize_all()
                .await
                .context("서비스 초기화 실패")?;

            let user_repo = ServiceLocator::get::<UserRepository>();
            let auth_repo = ServiceLocator::get::<AuthRepository>();

            user_repo.create_indexes().await?;
            auth_repo.create_indexes().await?;

            let users: Arc<dyn UserStore> = user_repo;
            let auths: Arc<dyn AuthStore> = auth_repo;
            Ok((users, auths))
        }
    }
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(runtime: Arc<AuthRuntime>, provider: GithubProvider) -> std::io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 GitHub 로그인: http://{}{}", bind_address, provider.routes.begin);

    // Rate Limiting 설정
    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    let routes = provider.routes.clone();
    let runtime = web::Data::from(runtime);
    let provider = web::Data::new(provider);

    HttpServer::new(move || {
        let routes = routes.clone();

        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())

            .app_data(runtime.clone())
            .app_data(provider.clone())

            // 라우트 설정
            .configure(move |cfg| configure_all_routes(cfg, &routes))
    })
        .bind(bind_address)?
        .workers(4) // 워커 스레드 수
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG`가 없으면 `info,actix_web=debug`로 로깅을 초기화합니다.
///
/// ```bash
/// RUST_LOG=github_auth_service::services::github=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
async fn initialize_data_stores() -> Result<(Arc<Database>, Arc<RedisClient>), AppError> {
    info!("📡 데이터베이스 연결 중...");

    let database = Arc::new(Database::new().await?);
    let redis_client = Arc::new(RedisClient::new().await?);

    Ok((database, redis_client))
}

/// CORS 설정을 구성합니다
///
/// 로컬 프론트엔드 개발 서버와 자체 서버 Origin을 허용하고, 세션 쿠키 전달을 위해
/// 자격 증명을 지원합니다.
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8888")
        .allowed_origin("http://127.0.0.1:8888")

        .allowed_methods(vec!["GET", "OPTIONS"])

        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])

        // 자격 증명(쿠키 등) 지원
        .supports_credentials()

        // Preflight 요청 캐시 시간 (초)
        .max_age(3600)
}
