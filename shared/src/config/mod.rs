//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - JWT signing and token lifetime configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection

pub mod auth;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;

/// Configuration loading and validation errors
///
/// These are fatal: a process that cannot assemble a valid configuration
/// must not come up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid configuration for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Fails when the JWT signing material is missing or too weak; there is
    /// no fallback secret anywhere in the codebase.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env()?,
        })
    }
}
