//! 역할별 접근 확인 endpoint.
//!
//! - `GET /api/test/public` - 토큰 불필요
//! - `GET /api/test/user` - USER 이상
//! - `GET /api/test/admin` - ADMIN

use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{AdminAuth, AuthUser};
use crate::state::AppState;

/// GET /api/test/public
pub async fn public_content() -> &'static str {
    "This is a public endpoint!"
}

/// GET /api/test/user
pub async fn user_content(AuthUser(user): AuthUser) -> &'static str {
    debug!(user_id = user.id, "User endpoint accessed");
    "This is a protected user endpoint!"
}

/// GET /api/test/admin
pub async fn admin_content(AdminAuth(admin): AdminAuth) -> &'static str {
    debug!(user_id = admin.id, "Admin endpoint accessed");
    "This is a protected admin endpoint!"
}

/// 접근 확인 라우터 생성.
pub fn access_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/public", get(public_content))
        .route("/user", get(user_content))
        .route("/admin", get(admin_content))
}
