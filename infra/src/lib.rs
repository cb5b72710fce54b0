//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Shopfront
//! application: MySQL-backed implementations of the core repository traits
//! plus connection-pool bootstrap.
//!
//! Schema expectations:
//! - `users` - auto-increment `id`, unique `email`
//! - `refresh_tokens` - string `id` (UUID), unique `token_hash`, revocation
//!   metadata columns; rows are never deleted

pub mod database;

pub use database::connection::DatabasePool;
pub use database::mysql::{MySqlTokenRepository, MySqlUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Load environment configuration and build the database pool
///
/// Reads `.env` when present, then `DATABASE_URL` and the pool settings.
pub async fn initialize() -> Result<DatabasePool, InfrastructureError> {
    dotenvy::dotenv().ok();

    let config = sf_shared::config::DatabaseConfig::from_env();
    DatabasePool::new(config).await
}
