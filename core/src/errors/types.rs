//! Error taxonomies for authentication and token management.
//!
//! Variants deliberately carry no token internals: what reaches the caller
//! is an unauthenticated-style error with a stable code, nothing about why
//! a particular token failed.

use sf_shared::types::response::ErrorResponse;
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, issuer, audience, algorithm, or lifetime check failed on
    /// an access token
    #[error("Invalid token")]
    InvalidToken,

    /// Refresh token missing, not owned by the caller, or no longer active;
    /// also raised when any step of the refresh protocol fails
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; indistinguishable on purpose
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("User not found")]
    UserNotFound,
}

impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let code = match err {
            TokenError::InvalidToken => "INVALID_TOKEN",
            TokenError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
        };
        ErrorResponse::new(code, err.to_string())
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let code = match err {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::UserNotFound => "USER_NOT_FOUND",
        };
        ErrorResponse::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_codes() {
        let response: ErrorResponse = TokenError::InvalidToken.into();
        assert_eq!(response.error, "INVALID_TOKEN");

        let response: ErrorResponse = TokenError::InvalidRefreshToken.into();
        assert_eq!(response.error, "INVALID_REFRESH_TOKEN");
    }

    #[test]
    fn test_auth_error_codes() {
        let response: ErrorResponse = AuthError::InvalidCredentials.into();
        assert_eq!(response.error, "INVALID_CREDENTIALS");
        assert_eq!(response.message, "Invalid credentials");
    }

    #[test]
    fn test_error_messages_leak_no_internals() {
        // Whatever went wrong with a token, the caller sees the same text
        let message = TokenError::InvalidToken.to_string();
        assert_eq!(message, "Invalid token");
    }
}
