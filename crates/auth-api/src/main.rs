//! 인증 API 서버 진입점.
//!
//! 설정 로드 → 로깅 초기화 → 저장소 연결 → 라우터 구성 → 서버 시작 순으로 진행합니다.
//! 서명 키가 없거나 토큰 수명이 유효하지 않으면 시작하지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth_core::{
    init_logging, AppConfig, Argon2Hasher, AuthService, CorsConfig, CredentialStore,
    DatabaseConfig, InMemoryCredentialStore, TokenCodec,
};
use auth_api::{create_api_router, AppState, PgCredentialStore};
use axum::{http::HeaderValue, Router};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// CORS 레이어 생성.
///
/// 설정된 origin 중 파싱할 수 없는 값은 건너뜁니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    info!("CORS configured with {} allowed origins", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}

/// 자격증명 저장소 연결.
///
/// `database.url`이 설정되어 있으면 PostgreSQL에 연결하고 마이그레이션을 실행합니다.
/// 없으면 메모리 저장소를 사용합니다 (재시작 시 데이터 소실).
async fn connect_store(
    config: &DatabaseConfig,
) -> anyhow::Result<(Arc<dyn CredentialStore>, Option<sqlx::PgPool>)> {
    let Some(url) = config.url.as_deref() else {
        warn!("database.url not set, using in-memory credential store");
        let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
        return Ok((store, None));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    let store = PgCredentialStore::new(pool.clone());
    store.migrate().await.context("Failed to run migrations")?;
    info!("Connected to PostgreSQL, migrations applied");

    let store: Arc<dyn CredentialStore> = Arc::new(store);
    Ok((store, Some(pool)))
}

fn create_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    create_api_router()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("Failed to load configuration")?;

    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))?;

    info!("Starting auth API server...");

    let codec = TokenCodec::new(&config.jwt).context("Invalid token configuration")?;
    info!(ttl_secs = codec.ttl().num_seconds(), "Token codec initialized");

    let (store, db_pool) = connect_store(&config.database).await?;
    let auth = AuthService::new(store, Arc::new(Argon2Hasher::new()), codec);

    let state = Arc::new(AppState::new(auth, db_pool));
    info!(version = %state.version, "Application state initialized");

    let app = create_router(state, &config.cors);

    let addr = config
        .server
        .socket_addr()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
