//! 회원가입/로그인 서비스.
//!
//! 자격증명 저장소, 비밀번호 해셔, [`TokenCodec`]을 조합해 자격증명을
//! 토큰으로 바꿉니다. 각 작업은 단일 결과 또는 단일 실패를 반환하며
//! 부분 결과는 없습니다.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{Identity, NewIdentity};
use crate::error::{AuthError, AuthResult, StoreError};
use crate::password::PasswordHasher;
use crate::store::CredentialStore;
use crate::token::{decode_subject, TokenCodec};

/// 회원가입 입력.
#[derive(Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for SignupInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// 인증 결과: 발급된 토큰과 사용자 요약.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub identity: Identity,
}

/// 인증 서비스.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    codec: TokenCodec,
    /// 존재하지 않는 이메일로 로그인할 때 검증에 쓰는 해시
    dummy_hash: Option<String>,
}

/// 더미 해시의 원문. 로그인 성공에 쓰일 수 없습니다.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

impl AuthService {
    /// 서비스 생성.
    ///
    /// 생성 시 더미 해시를 한 번 계산하므로 해셔 비용이 한 번 발생합니다.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        codec: TokenCodec,
    ) -> Self {
        let dummy_hash = hasher
            .hash(DUMMY_PASSWORD)
            .inspect_err(|e| {
                warn!(error = %e, "Dummy hash unavailable, unknown-email logins skip verification")
            })
            .ok();

        Self {
            store,
            hasher,
            codec,
            dummy_hash,
        }
    }

    /// 토큰 코덱.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// 회원가입.
    ///
    /// 1. 이메일 중복 → [`AuthError::EmailTaken`]
    /// 2. 비밀번호 확인 불일치 → [`AuthError::PasswordMismatch`]
    /// 3. 해싱 후 USER 역할로 저장
    /// 4. 저장된 레코드의 이메일로 토큰 발급
    ///
    /// 실패 시 저장소에 쓰지 않습니다. 저장 단계에서 중복이 발견되면
    /// (동시 가입) 역시 `EmailTaken`입니다.
    pub async fn signup(&self, input: SignupInput) -> AuthResult<AuthSession> {
        if self.store.exists_by_email(&input.email).await? {
            info!(email = %input.email, "Signup rejected: email taken");
            return Err(AuthError::EmailTaken);
        }

        if input.password != input.confirm_password {
            debug!(email = %input.email, "Signup rejected: password mismatch");
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let identity = self
            .store
            .save(NewIdentity::user(input.name, input.email), password_hash)
            .await
            .inspect_err(|e| {
                if matches!(e, StoreError::Duplicate) {
                    warn!("Signup raced with a concurrent registration");
                }
            })?;

        let token = self.codec.issue(&identity.email, Utc::now());
        info!(user_id = identity.id, email = %identity.email, "User signed up");

        Ok(AuthSession { token, identity })
    }

    /// 로그인.
    ///
    /// 존재하지 않는 이메일과 잘못된 비밀번호는 모두 [`AuthError::BadCredentials`]입니다.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let credential = match self.store.find_by_email(email).await? {
            Some(credential) => credential,
            None => {
                // 계정 유무와 관계없이 해시 검증 한 번을 수행
                if let Some(dummy) = &self.dummy_hash {
                    let _ = self.hasher.verify(password, dummy);
                }
                info!(%email, "Login rejected");
                return Err(AuthError::BadCredentials);
            }
        };

        if !self.hasher.verify(password, &credential.password_hash) {
            info!(%email, "Login rejected");
            return Err(AuthError::BadCredentials);
        }

        let identity = credential.identity;
        let token = self.codec.issue(&identity.email, Utc::now());
        info!(user_id = identity.id, email = %identity.email, "User logged in");

        Ok(AuthSession { token, identity })
    }

    /// Bearer 토큰으로 사용자 확인.
    ///
    /// 토큰의 subject로 사용자를 조회한 뒤 서명/subject/만료를 검증합니다.
    /// 토큰 관련 실패는 모두 [`AuthError::InvalidToken`]입니다.
    pub async fn authenticate(&self, token: &str) -> AuthResult<Identity> {
        let subject = decode_subject(token).ok_or(AuthError::InvalidToken)?;

        let identity = self
            .store
            .find_by_email(&subject)
            .await?
            .map(|credential| credential.identity)
            .ok_or(AuthError::InvalidToken)?;

        if !self.codec.validate(token, &identity.email, Utc::now()) {
            debug!(email = %identity.email, "Token failed validation");
            return Err(AuthError::InvalidToken);
        }

        Ok(identity)
    }
}
