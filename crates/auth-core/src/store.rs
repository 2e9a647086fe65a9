//! 자격증명 저장소 추상화.
//!
//! 이메일 고유성 보장(동시 가입 경합 포함)은 저장소 구현의 책임입니다.
//! 중복 삽입은 반드시 [`StoreError::Duplicate`]로 보고해야 합니다.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{Credential, Identity, NewIdentity};
use crate::error::StoreError;

/// 자격증명 저장소.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct PgCredentialStore {
///     pool: PgPool,
/// }
///
/// #[async_trait]
/// impl CredentialStore for PgCredentialStore {
///     async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
///         // SELECT ... WHERE email = $1
///     }
///
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 이메일로 자격증명 조회 (정확히 일치).
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError>;

    /// 이메일 존재 여부.
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// 식별 정보와 비밀번호 해시를 단일 레코드로 저장.
    ///
    /// 저장된 레코드를 반환합니다. 저장소가 이메일을 정규화하면
    /// 반환값에 반영됩니다.
    ///
    /// # Errors
    ///
    /// - `StoreError::Duplicate`: 이미 같은 이메일이 존재
    /// - `StoreError::Backend`: 그 외 저장 실패
    async fn save(&self, identity: NewIdentity, password_hash: String)
        -> Result<Identity, StoreError>;
}

/// 메모리 기반 자격증명 저장소.
///
/// 데이터베이스가 설정되지 않은 개발 환경과 테스트에서 사용합니다.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    by_email: HashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 사용자 수.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.inner.read().await.by_email.get(email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.by_email.contains_key(email))
    }

    async fn save(
        &self,
        identity: NewIdentity,
        password_hash: String,
    ) -> Result<Identity, StoreError> {
        let mut state = self.inner.write().await;
        if state.by_email.contains_key(&identity.email) {
            return Err(StoreError::Duplicate);
        }

        state.next_id += 1;
        let saved = Identity {
            id: state.next_id,
            name: identity.name,
            email: identity.email,
            role: identity.role,
        };
        state.by_email.insert(
            saved.email.clone(),
            Credential {
                identity: saved.clone(),
                password_hash,
            },
        );

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryCredentialStore::new();
        assert!(store.is_empty().await);

        let saved = store
            .save(NewIdentity::user("Kim", "kim@example.com"), "hash".to_string())
            .await
            .unwrap();
        assert_eq!(saved.id, 1);
        assert_eq!(saved.role, Role::User);

        let found = store.find_by_email("kim@example.com").await.unwrap().unwrap();
        assert_eq!(found.identity, saved);
        assert_eq!(found.password_hash, "hash");

        assert!(store.exists_by_email("kim@example.com").await.unwrap());
        // 대소문자 구분
        assert!(!store.exists_by_email("KIM@example.com").await.unwrap());
        assert!(store.find_by_email("lee@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryCredentialStore::new();
        store
            .save(NewIdentity::user("Kim", "kim@example.com"), "h1".to_string())
            .await
            .unwrap();

        let result = store
            .save(NewIdentity::user("Other", "kim@example.com"), "h2".to_string())
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = InMemoryCredentialStore::new();
        let a = store
            .save(NewIdentity::user("A", "a@example.com"), "h".to_string())
            .await
            .unwrap();
        let b = store
            .save(NewIdentity::user("B", "b@example.com"), "h".to_string())
            .await
            .unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }
}
