//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum length of the JWT signing secret in bytes (256 bits)
pub const MIN_SECRET_BYTES: usize = 32;

/// JWT authentication configuration
///
/// There is deliberately no `Default` implementation: the signing secret
/// must always come from external configuration, never from a built-in
/// fallback value.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric secret key for HMAC-SHA256 signing
    pub secret: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Access token expiry time in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry time in days
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: String::from("shopfront"),
            audience: String::from("shopfront-api"),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Create from environment variables
    ///
    /// `JWT_SECRET` is required; issuer, audience, and expiry times fall
    /// back to service defaults. The result is validated before it is
    /// returned.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing {
            key: String::from("JWT_SECRET"),
        })?;

        let mut config = Self::new(secret);

        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("JWT_AUDIENCE") {
            config.audience = audience;
        }
        if let Ok(minutes) = std::env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES") {
            config.access_token_expiry_minutes = minutes.parse().map_err(|_| {
                ConfigError::Invalid {
                    key: String::from("JWT_ACCESS_TOKEN_EXPIRY_MINUTES"),
                    reason: format!("not an integer: {}", minutes),
                }
            })?;
        }
        if let Ok(days) = std::env::var("JWT_REFRESH_TOKEN_EXPIRY_DAYS") {
            config.refresh_token_expiry_days = days.parse().map_err(|_| {
                ConfigError::Invalid {
                    key: String::from("JWT_REFRESH_TOKEN_EXPIRY_DAYS"),
                    reason: format!("not an integer: {}", days),
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the signing material and token lifetimes
    ///
    /// The secret must be at least 256 bits. An empty or missing secret is
    /// fatal misconfiguration, caught here rather than on the first signing
    /// call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Missing {
                key: String::from("JWT_SECRET"),
            });
        }
        if self.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid {
                key: String::from("JWT_SECRET"),
                reason: format!("secret must be at least {} bytes", MIN_SECRET_BYTES),
            });
        }
        if self.access_token_expiry_minutes < 1 {
            return Err(ConfigError::Invalid {
                key: String::from("JWT_ACCESS_TOKEN_EXPIRY_MINUTES"),
                reason: String::from("must be at least 1"),
            });
        }
        if self.refresh_token_expiry_days < 1 {
            return Err(ConfigError::Invalid {
                key: String::from("JWT_REFRESH_TOKEN_EXPIRY_DAYS"),
                reason: String::from("must be at least 1"),
            });
        }
        Ok(())
    }

    /// Access token expiry in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    /// Refresh token expiry in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 24 * 60 * 60
    }
}
