//! 사용자 저장소 (PostgreSQL).
//!
//! `users` 테이블에 식별 정보와 비밀번호 해시를 단일 레코드로 저장합니다.
//! 이메일 고유성은 UNIQUE 제약으로 보장합니다.

use async_trait::async_trait;
use auth_core::error::StoreError;
use auth_core::{Credential, CredentialStore, Identity, NewIdentity, Role};
use sqlx::{FromRow, PgPool};
use tracing::warn;

/// users 테이블 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRecord {
    fn into_credential(self) -> Credential {
        let role = Role::parse(&self.role).unwrap_or_else(|| {
            warn!(user_id = self.id, role = %self.role, "Unknown role in database, using USER");
            Role::User
        });

        Credential {
            identity: Identity {
                id: self.id,
                name: self.name,
                email: self.email,
                role,
            },
            password_hash: self.password_hash,
        }
    }
}

/// PostgreSQL 자격증명 저장소.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 내장 마이그레이션 실행.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(record.map(UserRecord::into_credential))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;

        Ok(exists)
    }

    async fn save(
        &self,
        identity: NewIdentity,
        password_hash: String,
    ) -> Result<Identity, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role
            "#,
        )
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&password_hash)
        .bind(identity.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                StoreError::Duplicate
            } else {
                backend(e)
            }
        })?;

        Ok(record.into_credential().identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str) -> UserRecord {
        UserRecord {
            id: 7,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_record_into_credential() {
        let credential = record("ADMIN").into_credential();
        assert_eq!(credential.identity.id, 7);
        assert_eq!(credential.identity.email, "ann@example.com");
        assert_eq!(credential.identity.role, Role::Admin);
        assert_eq!(credential.password_hash, "$argon2id$stub");
    }

    #[test]
    fn test_unknown_role_falls_back_to_user() {
        assert_eq!(record("SUPERUSER").into_credential().identity.role, Role::User);
    }
}
