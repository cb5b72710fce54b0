//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::UserRole;

/// Authentication response containing tokens and account metadata
///
/// Returned after successful registration, login, or token refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Opaque refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Role of the authenticated account
    pub role: UserRole,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair
    pub fn from_token_pair(pair: TokenPair, role: UserRole) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.access_expires_in,
            role,
        }
    }
}
