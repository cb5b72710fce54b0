//! Shared utilities and common types for the Shopfront server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Pagination and API response types
//! - Utility functions (input validation, etc.)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, ConfigError, DatabaseConfig, Environment, JwtConfig};
pub use types::{ApiResponse, ErrorResponse, PagedResult, PageRequest};
