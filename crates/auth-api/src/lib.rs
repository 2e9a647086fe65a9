//! 인증 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 회원가입/로그인 API
//! - Bearer 토큰 인증 및 역할 기반 접근 제어
//! - PostgreSQL 자격증명 저장소
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 토큰 인증 추출기
//! - [`repository`]: PostgreSQL 저장소

pub mod auth;
pub mod error;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{AdminAuth, AuthRejection, AuthUser};
pub use error::{ApiErrorResponse, ApiResult};
pub use repository::PgCredentialStore;
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, create_test_state_with_store};
