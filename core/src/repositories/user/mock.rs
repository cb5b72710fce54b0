//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// Mock user repository for testing
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Flip an account's active flag; returns false when the user is unknown
    pub async fn set_active(&self, id: i64, is_active: bool) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create_user(&self, mut user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Validation {
                message: "Email already exists".to_string(),
            });
        }

        user.id = users.keys().max().copied().unwrap_or(0) + 1;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = MockUserRepository::new();

        let first = repo
            .create_user(User::new("a@example.com", "a", "hash", UserRole::Customer))
            .await
            .unwrap();
        let second = repo
            .create_user(User::new("b@example.com", "b", "hash", UserRole::Staff))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MockUserRepository::new();
        repo.create_user(User::new("a@example.com", "a", "hash", UserRole::Customer))
            .await
            .unwrap();

        let result = repo
            .create_user(User::new("a@example.com", "other", "hash", UserRole::Customer))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = MockUserRepository::new();
        let user = repo
            .create_user(User::new("a@example.com", "a", "hash", UserRole::Admin))
            .await
            .unwrap();

        let found = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(repo.email_exists("a@example.com").await.unwrap());
        assert!(!repo.email_exists("b@example.com").await.unwrap());
    }
}
