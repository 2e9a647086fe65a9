//! 회원가입/로그인 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /api/auth/signup` - 회원가입 후 토큰 발급
//! - `POST /api/auth/login` - 로그인 후 토큰 발급

use auth_core::{AuthSession, Role, SignupInput};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{auth_error, validation_error, ApiResult};
use crate::state::AppState;

/// 회원가입 요청.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1~100자여야 합니다"))]
    pub name: String,
    #[validate(email(message = "올바른 이메일 형식이 아닙니다"))]
    pub email: String,
    #[validate(length(min = 6, message = "비밀번호는 6자 이상이어야 합니다"))]
    pub password: String,
    pub confirm_password: String,
}

impl From<SignupRequest> for SignupInput {
    fn from(req: SignupRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        }
    }
}

/// 로그인 요청.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "올바른 이메일 형식이 아닙니다"))]
    pub email: String,
    #[validate(length(min = 1, message = "비밀번호를 입력하세요"))]
    pub password: String,
}

/// 인증 성공 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            id: session.identity.id,
            name: session.identity.name,
            email: session.identity.email,
            role: session.identity.role,
        }
    }
}

/// 회원가입.
///
/// POST /api/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    let session = state.auth.signup(req.into()).await.map_err(auth_error)?;
    Ok(Json(session.into()))
}

/// 로그인.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    let session = state
        .auth
        .login(&req.email, &req.password)
        .await
        .map_err(auth_error)?;
    Ok(Json(session.into()))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
