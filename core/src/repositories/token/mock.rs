//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository for testing
///
/// Conditional updates hold the write guard across check and mutation, so
/// the mock gives the same exactly-once rotation guarantee the database
/// implementation does.
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_active())
            .cloned()
            .collect())
    }

    async fn rotate_if_active(
        &self,
        token_hash: &str,
        user_id: i64,
        revoked_by_ip: &str,
        replacement: RefreshToken,
    ) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&replacement.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        match tokens.get_mut(token_hash) {
            Some(old) if old.user_id == user_id && old.is_active() => {
                old.revoke(revoked_by_ip, Some(replacement.token_hash.clone()));
            }
            _ => return Ok(false),
        }

        tokens.insert(replacement.token_hash.clone(), replacement);
        Ok(true)
    }

    async fn revoke_if_active(
        &self,
        token_hash: &str,
        revoked_by_ip: &str,
    ) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token_hash) {
            Some(token) if token.is_active() => {
                token.revoke(revoked_by_ip, None);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_user_tokens(
        &self,
        user_id: i64,
        revoked_by_ip: &str,
    ) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens.values_mut() {
            if token.user_id == user_id && token.is_active() {
                token.revoke(revoked_by_ip, None);
                count += 1;
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_token(user_id: i64, hash: &str) -> RefreshToken {
        RefreshToken::new(user_id, hash.to_string(), "10.0.0.1".to_string(), 7)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = MockTokenRepository::new();
        let token = active_token(1, "hash-a");

        repo.save_refresh_token(token.clone()).await.unwrap();

        let found = repo.find_refresh_token("hash-a").await.unwrap().unwrap();
        assert_eq!(found, token);
        assert!(repo.find_refresh_token("hash-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_hash() {
        let repo = MockTokenRepository::new();
        repo.save_refresh_token(active_token(1, "hash-a")).await.unwrap();

        let result = repo.save_refresh_token(active_token(2, "hash-a")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_rotate_links_replacement() {
        let repo = MockTokenRepository::new();
        repo.save_refresh_token(active_token(1, "old")).await.unwrap();

        let rotated = repo
            .rotate_if_active("old", 1, "10.0.0.2", active_token(1, "new"))
            .await
            .unwrap();
        assert!(rotated);

        let old = repo.find_refresh_token("old").await.unwrap().unwrap();
        assert!(old.is_revoked);
        assert_eq!(old.replaced_by_token.as_deref(), Some("new"));
        assert_eq!(old.revoked_by_ip.as_deref(), Some("10.0.0.2"));

        let new = repo.find_refresh_token("new").await.unwrap().unwrap();
        assert!(new.is_active());
    }

    #[tokio::test]
    async fn test_rotate_refuses_wrong_owner() {
        let repo = MockTokenRepository::new();
        repo.save_refresh_token(active_token(1, "old")).await.unwrap();

        let rotated = repo
            .rotate_if_active("old", 2, "10.0.0.2", active_token(2, "new"))
            .await
            .unwrap();
        assert!(!rotated);

        // Nothing changed: old token still active, replacement not stored
        assert!(repo.find_refresh_token("old").await.unwrap().unwrap().is_active());
        assert!(repo.find_refresh_token("new").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotate_refuses_revoked_token() {
        let repo = MockTokenRepository::new();
        repo.save_refresh_token(active_token(1, "old")).await.unwrap();
        repo.revoke_if_active("old", "10.0.0.1").await.unwrap();

        let rotated = repo
            .rotate_if_active("old", 1, "10.0.0.2", active_token(1, "new"))
            .await
            .unwrap();
        assert!(!rotated);
    }

    #[tokio::test]
    async fn test_revoke_all_user_tokens() {
        let repo = MockTokenRepository::new();
        repo.save_refresh_token(active_token(1, "a")).await.unwrap();
        repo.save_refresh_token(active_token(1, "b")).await.unwrap();
        repo.save_refresh_token(active_token(2, "c")).await.unwrap();

        let revoked = repo.revoke_all_user_tokens(1, "10.0.0.9").await.unwrap();
        assert_eq!(revoked, 2);

        assert!(repo.find_by_user_id(1).await.unwrap().is_empty());
        assert_eq!(repo.find_by_user_id(2).await.unwrap().len(), 1);
    }
}
