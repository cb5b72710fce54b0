//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, warn};

use sf_shared::utils::validation::{is_valid_email, is_valid_username};

use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Authentication service for the complete account flow
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// User repository for account persistence
    user_repository: Arc<U>,
    /// Token service for JWT and refresh token management
    token_service: Arc<TokenService<T>>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<T>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            config,
        }
    }

    /// Register a new account and issue its first token pair
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
        role: UserRole,
        caller_ip: &str,
    ) -> DomainResult<AuthResponse> {
        if !self.config.allow_registration {
            return Err(DomainError::Validation {
                message: "Registration is disabled".to_string(),
            });
        }
        if !is_valid_email(email) {
            return Err(DomainError::Validation {
                message: "Invalid email address".to_string(),
            });
        }
        if !is_valid_username(username) {
            return Err(DomainError::Validation {
                message: "Invalid username".to_string(),
            });
        }
        if self.user_repository.email_exists(email).await? {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let password_hash =
            bcrypt::hash(password, self.config.bcrypt_cost).map_err(|e| DomainError::Internal {
                message: format!("Failed to hash password: {}", e),
            })?;

        let user = self
            .user_repository
            .create_user(User::new(email, username, password_hash, role))
            .await?;

        debug!(user_id = user.id, "registered new user");

        self.issue_response(&user, caller_ip).await
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password fail identically so the endpoint
    /// cannot be used to probe for registered addresses.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        caller_ip: &str,
    ) -> DomainResult<AuthResponse> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_matches =
            bcrypt::verify(password, &user.password_hash).map_err(|e| DomainError::Internal {
                message: format!("Failed to verify password: {}", e),
            })?;
        if !password_matches {
            warn!(user_id = user.id, "login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.is_active {
            return Err(AuthError::AccountDisabled.into());
        }

        debug!(user_id = user.id, "login succeeded");

        self.issue_response(&user, caller_ip).await
    }

    /// Exchange an expired access token plus a refresh token for a new pair
    ///
    /// The account is re-checked before the rotation so a disabled or
    /// deleted account cannot keep its sessions alive. Every failure
    /// surfaces as `InvalidRefreshToken`.
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
        caller_ip: &str,
    ) -> DomainResult<AuthResponse> {
        let claims = self
            .token_service
            .extract_claims_ignoring_expiry(access_token)
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;
        if !user.is_active {
            return Err(DomainError::Token(TokenError::InvalidRefreshToken));
        }

        let pair = self
            .token_service
            .refresh_tokens(access_token, refresh_token, caller_ip)
            .await?;

        Ok(AuthResponse::from_token_pair(pair, user.role))
    }

    /// Revoke the presented refresh token (logout)
    pub async fn logout(&self, refresh_token: &str, caller_ip: &str) -> DomainResult<bool> {
        self.token_service
            .revoke_refresh_token(refresh_token, caller_ip)
            .await
    }

    /// Revoke every session a user holds (logout everywhere)
    pub async fn logout_all(&self, user_id: i64, caller_ip: &str) -> DomainResult<usize> {
        self.token_service.revoke_all_tokens(user_id, caller_ip).await
    }

    async fn issue_response(&self, user: &User, caller_ip: &str) -> DomainResult<AuthResponse> {
        let pair = self
            .token_service
            .issue_tokens(user.id, &user.email, user.role, &user.username, caller_ip)
            .await?;
        Ok(AuthResponse::from_token_pair(pair, user.role))
    }
}
