//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::UserRole;

/// Claims structure for the access-token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Account email
    pub email: String,

    /// Account role
    pub role: UserRole,

    /// Display username
    pub username: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Creates claims for a new access token
    ///
    /// Every token gets a fresh random `jti`; duplicate token identifiers
    /// would blind replay-detection tooling downstream.
    pub fn new_access_token(
        user_id: i64,
        email: impl Into<String>,
        role: UserRole,
        username: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiry_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(expiry_minutes);

        Self {
            sub: user_id.to_string(),
            email: email.into(),
            role,
            username: username.into(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.sub.parse()
    }
}

/// Refresh token entity stored in the database
///
/// Records are never physically deleted. Revocation metadata plus the
/// `replaced_by_token` chain form the audit trail of a session: each
/// rotation links the revoked record to the hash of its successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: i64,

    /// Hashed token value; the raw bearer string is never stored
    pub token_hash: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// IP address the token was issued to
    pub created_by_ip: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub is_revoked: bool,

    /// Timestamp of revocation, if any
    pub revoked_at: Option<DateTime<Utc>>,

    /// IP address that triggered the revocation
    pub revoked_by_ip: Option<String>,

    /// Hash of the token that superseded this one during rotation
    pub replaced_by_token: Option<String>,
}

impl RefreshToken {
    /// Creates a new active refresh token
    pub fn new(
        user_id: i64,
        token_hash: String,
        created_by_ip: String,
        expiry_days: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: now,
            created_by_ip,
            expires_at: now + Duration::days(expiry_days),
            is_revoked: false,
            revoked_at: None,
            revoked_by_ip: None,
            replaced_by_token: None,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the refresh token is active
    ///
    /// Active tokens are the only ones accepted for rotation or revocation.
    pub fn is_active(&self) -> bool {
        !self.is_revoked && !self.is_expired()
    }

    /// Revokes the refresh token
    ///
    /// Terminal: there is no transition back to active. `replaced_by_token`
    /// is the hash of the successor when the revocation is part of a
    /// rotation, `None` for logout or explicit revocation.
    pub fn revoke(&mut self, revoked_by_ip: impl Into<String>, replaced_by_token: Option<String>) {
        self.is_revoked = true;
        self.revoked_at = Some(Utc::now());
        self.revoked_by_ip = Some(revoked_by_ip.into());
        self.replaced_by_token = replaced_by_token;
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Opaque refresh token; clients must not parse it
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with calculated expiry times
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expiry_minutes: i64,
        refresh_expiry_days: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: access_expiry_minutes * 60,
            refresh_expires_in: refresh_expiry_days * 24 * 60 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims::new_access_token(
            42,
            "alice@example.com",
            UserRole::Customer,
            "alice",
            "shopfront",
            "shopfront-api",
            15,
        )
    }

    #[test]
    fn test_access_token_claims() {
        let claims = sample_claims();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, UserRole::Customer);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "shopfront");
        assert_eq!(claims.aud, "shopfront-api");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_get_fresh_token_ids() {
        let first = sample_claims();
        let second = sample_claims();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_claims_user_id_parsing() {
        let claims = sample_claims();
        assert_eq!(claims.user_id().unwrap(), 42);

        let mut bad = sample_claims();
        bad.sub = String::from("not-a-number");
        assert!(bad.user_id().is_err());
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = sample_claims();
        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_refresh_token_creation() {
        let token = RefreshToken::new(42, "hash".to_string(), "10.0.0.1".to_string(), 7);

        assert_eq!(token.user_id, 42);
        assert_eq!(token.created_by_ip, "10.0.0.1");
        assert!(!token.is_revoked);
        assert!(token.revoked_at.is_none());
        assert!(token.replaced_by_token.is_none());
        assert!(!token.is_expired());
        assert!(token.is_active());
    }

    #[test]
    fn test_refresh_token_revocation() {
        let mut token = RefreshToken::new(42, "hash".to_string(), "10.0.0.1".to_string(), 7);

        token.revoke("10.0.0.2", Some("next-hash".to_string()));

        assert!(token.is_revoked);
        assert!(!token.is_active());
        assert_eq!(token.revoked_by_ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(token.replaced_by_token.as_deref(), Some("next-hash"));
        assert!(token.revoked_at.is_some());
    }

    #[test]
    fn test_refresh_token_expiration() {
        let mut token = RefreshToken::new(42, "hash".to_string(), "10.0.0.1".to_string(), 7);
        token.expires_at = Utc::now() - Duration::days(1);

        assert!(token.is_expired());
        assert!(!token.is_active());
        assert_eq!(token.time_until_expiration(), Duration::zero());
    }

    #[test]
    fn test_token_pair_expiry_seconds() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 15, 7);

        assert_eq!(pair.access_expires_in, 900);
        assert_eq!(pair.refresh_expires_in, 604800);
    }

    #[test]
    fn test_claims_serialization() {
        let claims = sample_claims();
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, back);
    }

    #[test]
    fn test_refresh_token_serialization() {
        let token = RefreshToken::new(42, "hash".to_string(), "10.0.0.1".to_string(), 7);
        let json = serde_json::to_string(&token).unwrap();
        let back: RefreshToken = serde_json::from_str(&json).unwrap();
        assert_eq!(token, back);
    }
}
