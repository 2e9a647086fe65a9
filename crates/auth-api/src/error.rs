//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use auth_core::{AuthError, AuthErrorKind};
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "EMAIL_TAKEN",
///   "message": "이미 사용 중인 이메일입니다"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "BAD_CREDENTIALS", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 인증 서비스 에러를 HTTP 응답으로 변환.
///
/// 내부 에러의 원인은 로그에만 남기고 응답에는 노출하지 않습니다.
pub fn auth_error(err: AuthError) -> (StatusCode, Json<ApiErrorResponse>) {
    let status = match (&err, err.kind()) {
        (AuthError::EmailTaken, _) => StatusCode::CONFLICT,
        (_, AuthErrorKind::Validation) => StatusCode::BAD_REQUEST,
        (_, AuthErrorKind::Authentication) => StatusCode::UNAUTHORIZED,
        (_, AuthErrorKind::Internal) => {
            error!(error = %err, "Authentication backend failure");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::new("INTERNAL_ERROR", "내부 서버 에러")),
            );
        }
    };

    (status, Json(ApiErrorResponse::new(err.code(), err.to_string())))
}

/// 요청 검증 실패를 HTTP 응답으로 변환.
pub fn validation_error(errors: validator::ValidationErrors) -> (StatusCode, Json<ApiErrorResponse>) {
    let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "VALIDATION_ERROR",
            "요청 값이 올바르지 않습니다",
            details,
        )),
    )
}
