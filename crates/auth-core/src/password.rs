//! 비밀번호 해싱.
//!
//! [`PasswordHasher`]는 서비스가 의존하는 단방향 해시 추상화이며,
//! 기본 구현은 Argon2id([`Argon2Hasher`])입니다.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Argon2,
};
use tracing::warn;

use crate::error::PasswordError;

/// 단방향 비밀번호 해시.
pub trait PasswordHasher: Send + Sync {
    /// 평문 비밀번호를 해싱합니다.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// 평문 비밀번호가 저장된 해시와 일치하는지 확인합니다.
    ///
    /// 해시 형식이 잘못된 경우에도 `false`를 반환합니다.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id 해셔.
///
/// 솔트는 해싱마다 새로 생성되며, 결과는 PHC 형식 문자열입니다
/// (`$argon2id$v=19$m=19456,t=2,p=1$...`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| PasswordError::HashingFailed)?;

        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed = match parse_hash(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash rejected");
                return false;
            }
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

/// PHC 형식 해시 파싱.
fn parse_hash(hash: &str) -> Result<PasswordHash<'_>, PasswordError> {
    PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("TestPassword123!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("TestPassword123!", &hash));
        assert!(!hasher.verify("WrongPassword123!", &hash));
    }

    #[test]
    fn test_different_salts() {
        let hasher = Argon2Hasher::new();
        let hash1 = hasher.hash("Password1").unwrap();
        let hash2 = hasher.hash("Password1").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("Password1", &hash1));
        assert!(hasher.verify("Password1", &hash2));
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(!Argon2Hasher::new().verify("password", "not-a-valid-hash"));
        assert!(matches!(
            parse_hash("not-a-valid-hash"),
            Err(PasswordError::InvalidHashFormat)
        ));
        assert!(parse_hash("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA").is_ok());
    }

    #[test]
    fn test_unicode_password() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("한글패스워드123").unwrap();
        assert!(hasher.verify("한글패스워드123", &hash));
    }
}
