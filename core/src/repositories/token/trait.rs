//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken entity persistence operations
///
/// Rotation and revocation are conditional updates: the store must check
/// the active-state precondition and apply the mutation in one atomic step,
/// so that two racing refresh calls presenting the same token cannot both
/// succeed. Tokens are stored hashed and never physically deleted; revoked
/// and expired records remain as the audit trail.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token to the repository
    ///
    /// # Example
    /// ```no_run
    /// # use sf_core::repositories::TokenRepository;
    /// # use sf_core::domain::entities::token::RefreshToken;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token = RefreshToken::new(42, "hashed_value".to_string(), "10.0.0.1".to_string(), 7);
    /// let saved = repo.save_refresh_token(token).await?;
    /// println!("Token saved with ID: {}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its hashed value
    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Find a refresh token by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError>;

    /// Find all active refresh tokens for a user (multi-device sessions)
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<RefreshToken>, DomainError>;

    /// Atomically revoke `token_hash` and persist `replacement` in its place
    ///
    /// The mutation applies only when the old token is still active and
    /// owned by `user_id`. On success the old record is stamped with
    /// `revoked_by_ip` and linked to the replacement through
    /// `replaced_by_token`, and the replacement is inserted in the same
    /// transaction.
    ///
    /// # Returns
    /// * `Ok(true)` - Token rotated
    /// * `Ok(false)` - Precondition failed; nothing was changed
    /// * `Err(DomainError)` - Store failure
    async fn rotate_if_active(
        &self,
        token_hash: &str,
        user_id: i64,
        revoked_by_ip: &str,
        replacement: RefreshToken,
    ) -> Result<bool, DomainError>;

    /// Revoke a token if it is still active
    ///
    /// # Returns
    /// * `Ok(true)` - Token revoked
    /// * `Ok(false)` - Token unknown, expired, or already revoked
    /// * `Err(DomainError)` - Store failure
    async fn revoke_if_active(
        &self,
        token_hash: &str,
        revoked_by_ip: &str,
    ) -> Result<bool, DomainError>;

    /// Revoke every active token a user holds
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens revoked
    /// * `Err(DomainError)` - Store failure
    async fn revoke_all_user_tokens(
        &self,
        user_id: i64,
        revoked_by_ip: &str,
    ) -> Result<usize, DomainError>;

    /// Check if a token exists and is active
    async fn is_token_active(&self, token_hash: &str) -> Result<bool, DomainError> {
        match self.find_refresh_token(token_hash).await? {
            Some(token) => Ok(token.is_active()),
            None => Ok(false),
        }
    }
}
