//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh tokens are stored by hash and never deleted; revocation and
//! rotation mutate state in place. Rotation runs as a conditional UPDATE
//! plus an INSERT inside a single transaction, so two concurrent refresh
//! calls presenting the same token leave exactly one winner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sf_core::domain::entities::token::RefreshToken;
use sf_core::errors::DomainError;
use sf_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: row.try_get("user_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get user_id: {}", e),
            })?,
            token_hash: row.try_get("token_hash").map_err(|e| DomainError::Internal {
                message: format!("Failed to get token_hash: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            created_by_ip: row
                .try_get("created_by_ip")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_by_ip: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            is_revoked: row.try_get("is_revoked").map_err(|e| DomainError::Internal {
                message: format!("Failed to get is_revoked: {}", e),
            })?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get revoked_at: {}", e),
                })?,
            revoked_by_ip: row
                .try_get::<Option<String>, _>("revoked_by_ip")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get revoked_by_ip: {}", e),
                })?,
            replaced_by_token: row
                .try_get::<Option<String>, _>("replaced_by_token")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get replaced_by_token: {}", e),
                })?,
        })
    }

    /// Insert a refresh token using the given executor
    async fn insert_token<'e, E>(token: &RefreshToken, executor: E) -> Result<(), DomainError>
    where
        E: sqlx::Executor<'e, Database = sqlx::MySql>,
    {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, created_at, created_by_ip,
                expires_at, is_revoked, revoked_at, revoked_by_ip, replaced_by_token
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id)
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(&token.created_by_ip)
            .bind(token.expires_at)
            .bind(token.is_revoked)
            .bind(token.revoked_at)
            .bind(&token.revoked_by_ip)
            .bind(&token.replaced_by_token)
            .execute(executor)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to save refresh token: {}", e),
            })?;

        Ok(())
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let check_query =
            "SELECT EXISTS(SELECT 1 FROM refresh_tokens WHERE token_hash = ?) as already_there";
        let exists_row = sqlx::query(check_query)
            .bind(&token.token_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check token existence: {}", e),
            })?;

        let exists: i8 = exists_row
            .try_get("already_there")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get existence result: {}", e),
            })?;

        if exists == 1 {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        Self::insert_token(&token, &self.pool).await?;
        Ok(token)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, created_by_ip,
                   expires_at, is_revoked, revoked_at, revoked_by_ip, replaced_by_token
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find refresh token: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, created_by_ip,
                   expires_at, is_revoked, revoked_at, revoked_by_ip, replaced_by_token
            FROM refresh_tokens
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find token by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, created_by_ip,
                   expires_at, is_revoked, revoked_at, revoked_by_ip, replaced_by_token
            FROM refresh_tokens
            WHERE user_id = ?
                AND is_revoked = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user tokens: {}", e),
            })?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(Self::row_to_token(&row)?);
        }

        Ok(tokens)
    }

    async fn rotate_if_active(
        &self,
        token_hash: &str,
        user_id: i64,
        revoked_by_ip: &str,
        replacement: RefreshToken,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin rotation transaction: {}", e),
        })?;

        // The WHERE clause is the whole point: state check and revocation
        // happen in one statement, so a concurrent rotation of the same
        // token matches zero rows instead of double-spending it.
        let revoke_query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE,
                revoked_at = ?,
                revoked_by_ip = ?,
                replaced_by_token = ?
            WHERE token_hash = ?
                AND user_id = ?
                AND is_revoked = FALSE
                AND expires_at > ?
        "#;

        let now = Utc::now();
        let result = sqlx::query(revoke_query)
            .bind(now)
            .bind(revoked_by_ip)
            .bind(&replacement.token_hash)
            .bind(token_hash)
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke token for rotation: {}", e),
            })?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| DomainError::Internal {
                message: format!("Failed to roll back rotation: {}", e),
            })?;
            return Ok(false);
        }

        Self::insert_token(&replacement, &mut *tx).await?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit rotation: {}", e),
        })?;

        Ok(true)
    }

    async fn revoke_if_active(
        &self,
        token_hash: &str,
        revoked_by_ip: &str,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE,
                revoked_at = ?,
                revoked_by_ip = ?
            WHERE token_hash = ?
                AND is_revoked = FALSE
                AND expires_at > ?
        "#;

        let now = Utc::now();
        let result = sqlx::query(query)
            .bind(now)
            .bind(revoked_by_ip)
            .bind(token_hash)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke token: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_user_tokens(
        &self,
        user_id: i64,
        revoked_by_ip: &str,
    ) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE,
                revoked_at = ?,
                revoked_by_ip = ?
            WHERE user_id = ?
                AND is_revoked = FALSE
                AND expires_at > ?
        "#;

        let now = Utc::now();
        let result = sqlx::query(query)
            .bind(now)
            .bind(revoked_by_ip)
            .bind(user_id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke user tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
