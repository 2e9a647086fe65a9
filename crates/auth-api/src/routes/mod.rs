//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/auth` - 회원가입/로그인
//! - `/api/test` - 역할별 접근 확인

pub mod access;
pub mod auth;
pub mod health;

pub use access::access_router;
pub use auth::{auth_router, AuthResponse, LoginRequest, SignupRequest};
pub use health::{health_router, ComponentStatus, HealthResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/auth", auth_router())
        .nest("/api/test", access_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request, StatusCode},
        response::Response,
    };
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> Router {
        create_api_router().with_state(Arc::new(create_test_state()))
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_auth(response: Response) -> AuthResponse {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_mounted_paths() {
        let app = app();

        assert_eq!(send(app.clone(), get("/health", None)).await.status(), StatusCode::OK);
        assert_eq!(
            send(app.clone(), get("/health/ready", None)).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            send(app.clone(), get("/api/test/public", None)).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            send(app.clone(), get("/api/test/user", None)).await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(app, get("/api/test/admin", None)).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_signup_login_and_access_flow() {
        let app = app();

        let signup = send(
            app.clone(),
            post_json(
                "/api/auth/signup",
                json!({
                    "name": "Ann",
                    "email": "ann@example.com",
                    "password": "secret1",
                    "confirmPassword": "secret1"
                }),
            ),
        )
        .await;
        assert_eq!(signup.status(), StatusCode::OK);
        let signup = read_auth(signup).await;

        let login = send(
            app.clone(),
            post_json(
                "/api/auth/login",
                json!({ "email": "ann@example.com", "password": "secret1" }),
            ),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        let login = read_auth(login).await;
        assert_eq!(login.id, signup.id);

        assert_eq!(
            send(app.clone(), get("/api/test/user", Some(&login.token))).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            send(app.clone(), get("/api/test/user", Some(&signup.token))).await.status(),
            StatusCode::OK
        );
        // 새 사용자는 USER 역할
        assert_eq!(
            send(app, get("/api/test/admin", Some(&login.token))).await.status(),
            StatusCode::FORBIDDEN
        );
    }
}
