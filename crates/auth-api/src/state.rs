//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 시작 시 한 번 구성되며 이후에는 읽기 전용입니다.
//! Arc로 래핑되어 여러 요청 간에 공유됩니다.

use auth_core::AuthService;
use std::sync::Arc;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 회원가입/로그인/토큰 확인 서비스
    pub auth: Arc<AuthService>,

    /// 데이터베이스 연결 풀 (메모리 저장소 사용 시 None)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(auth: AuthService, db_pool: Option<sqlx::PgPool>) -> Self {
        Self {
            auth: Arc::new(auth),
            db_pool,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }
}

/// 테스트용 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성.
///
/// 메모리 저장소와 Argon2 해셔, 1시간 수명 토큰을 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    create_test_state_with_store(Arc::new(auth_core::InMemoryCredentialStore::new()))
}

/// 주어진 메모리 저장소로 테스트용 AppState 생성.
///
/// 관리자 계정 등을 미리 넣어 두어야 할 때 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state_with_store(store: Arc<auth_core::InMemoryCredentialStore>) -> AppState {
    use auth_core::{Argon2Hasher, JwtConfig, TokenCodec};

    let codec = TokenCodec::new(&JwtConfig::new(TEST_JWT_SECRET, 3600))
        .expect("test JWT config is valid");
    let auth = AuthService::new(store, Arc::new(Argon2Hasher::new()), codec);

    AppState::new(auth, None)
}
