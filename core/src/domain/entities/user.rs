//! User entity and role definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role controlling authorization level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access
    Admin,
    /// Store staff: catalog and order management
    Staff,
    /// Regular shopper
    Customer,
}

impl UserRole {
    /// String form used in claims and database columns
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
            UserRole::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            "customer" => Ok(UserRole::Customer),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// User account entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the database on insert
    pub id: i64,

    /// Account email, unique across the store
    pub email: String,

    /// Display username
    pub username: String,

    /// bcrypt hash; raw passwords are never persisted
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Disabled accounts cannot authenticate
    pub is_active: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user pending persistence
    ///
    /// The ID is zero until the repository assigns one.
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: 0,
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Staff, UserRole::Customer] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("STAFF".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serde_uses_lowercase() {
        let json = serde_json::to_string(&UserRole::Customer).unwrap();
        assert_eq!(json, "\"customer\"");
    }

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("alice@example.com", "alice", "hash", UserRole::Customer);
        assert_eq!(user.id, 0);
        assert!(user.is_active);
        assert_eq!(user.role, UserRole::Customer);
    }
}
