//! Bearer 토큰 인증 추출기.
//!
//! Axum 핸들러에서 사용할 인증/권한 추출기.

use auth_core::{AuthError, Identity, Role};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 인증된 사용자 추출기.
///
/// `Authorization: Bearer <token>` 헤더의 토큰을 검증하고 저장소에서
/// 사용자를 불러옵니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

/// ADMIN 권한을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Identity);

/// 인증 거부 사유.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("권한이 부족합니다")]
    InsufficientPermission,
    #[error("내부 서버 에러")]
    Internal,
}

impl AuthRejection {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthRejection::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            AuthRejection::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            AuthRejection::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthRejection::InsufficientPermission => {
                (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSION")
            }
            AuthRejection::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(_) | AuthError::Hashing(_) => {
                error!(error = %err, "Token authentication failed internally");
                AuthRejection::Internal
            }
            _ => AuthRejection::InvalidToken,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        (status, Json(ApiErrorResponse::new(code, self.to_string()))).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let identity = state.auth.authenticate(token).await?;
        Ok(AuthUser(identity))
    }
}

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        require_role(Role::Admin, &identity)?;
        Ok(AdminAuth(identity))
    }
}

/// Authorization 헤더에서 Bearer 토큰 추출.
fn bearer_token(parts: &Parts) -> Result<&str, AuthRejection> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?
        .to_str()
        .map_err(|_| AuthRejection::InvalidAuthHeader)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthRejection::InvalidAuthHeader)
}

/// 특정 역할 이상의 권한 확인.
///
/// 권한이 충분하면 `Ok(())`, 부족하면 [`AuthRejection::InsufficientPermission`].
pub fn require_role(required: Role, identity: &Identity) -> Result<(), AuthRejection> {
    if identity.role.satisfies(required) {
        Ok(())
    } else {
        Err(AuthRejection::InsufficientPermission)
    }
}
