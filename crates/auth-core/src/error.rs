//! 인증 시스템의 에러 타입.
//!
//! 계층별 에러를 정의합니다:
//! - [`AuthError`]: 회원가입/로그인/토큰 확인 실패 (호출자에게 노출)
//! - [`StoreError`]: 자격증명 저장소 실패
//! - [`PasswordError`]: 비밀번호 해싱 실패
//! - [`TokenError`]: 토큰 해석 실패 (공개 API 밖으로 전파되지 않음)
//! - [`ConfigError`]: 시작 시점의 치명적 설정 에러

use thiserror::Error;

/// 인증 서비스 에러.
///
/// 메시지 문자열이 아니라 [`AuthError::kind`]로 실패 범주를 구분합니다.
#[derive(Debug, Error)]
pub enum AuthError {
    /// 이미 가입된 이메일 (사전 확인 또는 저장 시 중복 제약 위반)
    #[error("이미 사용 중인 이메일입니다")]
    EmailTaken,

    /// 비밀번호 확인 불일치
    #[error("비밀번호가 일치하지 않습니다")]
    PasswordMismatch,

    /// 이메일 또는 비밀번호 오류.
    ///
    /// 계정 존재 여부를 노출하지 않도록 두 경우 모두 같은 메시지를 사용합니다.
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    BadCredentials,

    /// 유효하지 않거나 만료된 토큰
    #[error("유효하지 않은 토큰")]
    InvalidToken,

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Store(String),

    /// 비밀번호 해싱 에러
    #[error(transparent)]
    Hashing(#[from] PasswordError),
}

/// 인증 에러 범주.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// 요청 자체가 거부됨 (비밀번호 불일치, 이메일 중복)
    Validation,
    /// 인증 실패 (잘못된 자격증명, 잘못된 토큰)
    Authentication,
    /// 내부 에러 (저장소, 해싱)
    Internal,
}

impl AuthError {
    /// 에러 범주 반환.
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::PasswordMismatch => AuthErrorKind::Validation,
            AuthError::BadCredentials | AuthError::InvalidToken => AuthErrorKind::Authentication,
            AuthError::Store(_) | AuthError::Hashing(_) => AuthErrorKind::Internal,
        }
    }

    /// 에러 코드 반환 (API 응답용).
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::PasswordMismatch => "PASSWORD_MISMATCH",
            AuthError::BadCredentials => "BAD_CREDENTIALS",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Hashing(_) => "HASHING_ERROR",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            // 사전 확인과 동시 가입이 경합한 경우
            StoreError::Duplicate => AuthError::EmailTaken,
            StoreError::Backend(msg) => AuthError::Store(msg),
        }
    }
}

/// 자격증명 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 이메일 고유 제약 위반
    #[error("중복된 이메일")]
    Duplicate,

    /// 백엔드(DB 등) 에러
    #[error("백엔드 에러: {0}")]
    Backend(String),
}

/// 비밀번호 처리 에러.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 토큰 해석 에러.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("Base64 디코딩 실패: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("페이로드 파싱 실패: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("서명 불일치")]
    BadSignature,
}

/// 설정 에러.
///
/// 서버가 트래픽을 받기 전에 프로세스를 중단시켜야 하는 치명적 에러입니다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    #[error("JWT 서명 키가 설정되지 않았습니다")]
    MissingSecret,

    #[error("잘못된 토큰 만료 시간: {0}초")]
    InvalidExpiration(i64),

    #[error("HMAC 초기화 실패")]
    Hmac,
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;
