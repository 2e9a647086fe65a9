//! 사용자 식별 정보와 자격증명.

use serde::{Deserialize, Serialize};

use super::Role;

/// 저장된 사용자 식별 정보.
///
/// `email`이 토큰의 subject로 사용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// 저장소가 부여한 ID
    pub id: i64,
    /// 표시 이름
    pub name: String,
    /// 고유 식별자 (토큰 subject)
    pub email: String,
    /// 역할
    pub role: Role,
}

/// 저장 전 사용자 식별 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl NewIdentity {
    /// 기본 역할(USER)로 생성.
    pub fn user(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::User,
        }
    }
}

/// 저장된 자격증명.
///
/// 사용자 식별 정보와 1:1로 대응하는 비밀번호 해시입니다.
#[derive(Clone)]
pub struct Credential {
    pub identity: Identity,
    pub password_hash: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
