//! Main token service implementation

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Number of random bytes behind an opaque refresh token
const REFRESH_TOKEN_BYTES: usize = 32;

/// Service for issuing, validating, and rotating tokens
///
/// Signing is symmetric HMAC-SHA256 and nothing else: the validation is
/// pinned to that algorithm, so tokens carrying any other `alg` (including
/// `none`) are rejected before the signature is even checked.
///
/// The strict and the expiry-ignoring validation paths are separate methods
/// rather than a flag, so the relaxed one cannot be reached from
/// authorization code by accident.
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: R,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    relaxed_validation: Validation,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// Fails when the signing secret is missing or shorter than 256 bits.
    /// A service without usable signing material must not come up; the
    /// check runs here rather than on the first signing call.
    pub fn new(repository: R, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config
            .jwt
            .validate()
            .map_err(|e| DomainError::Configuration {
                message: e.to_string(),
            })?;

        let encoding_key = EncodingKey::from_secret(config.jwt.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt.issuer]);
        validation.set_audience(&[&config.jwt.audience]);
        validation.validate_exp = true;

        // Refresh flow only: identical checks minus the lifetime
        let mut relaxed_validation = validation.clone();
        relaxed_validation.validate_exp = false;

        Ok(Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
            relaxed_validation,
        })
    }

    /// Issues a signed access token for the given identity
    pub fn issue_access_token(
        &self,
        user_id: i64,
        email: &str,
        role: UserRole,
        username: &str,
    ) -> Result<String, DomainError> {
        let claims = Claims::new_access_token(
            user_id,
            email,
            role,
            username,
            &self.config.jwt.issuer,
            &self.config.jwt.audience,
            self.config.jwt.access_token_expiry_minutes,
        );
        self.encode_jwt(&claims)
    }

    /// Issues a fresh access + refresh token pair and persists the refresh
    /// token for the caller's session
    pub async fn issue_tokens(
        &self,
        user_id: i64,
        email: &str,
        role: UserRole,
        username: &str,
        caller_ip: &str,
    ) -> Result<TokenPair, DomainError> {
        let access_token = self.issue_access_token(user_id, email, role, username)?;
        let refresh_token = self.issue_refresh_token(user_id, caller_ip).await?;

        debug!(user_id, "issued token pair");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.jwt.access_token_expiry_minutes,
            self.config.jwt.refresh_token_expiry_days,
        ))
    }

    /// Verifies an access token: signature, issuer, audience, algorithm,
    /// and expiry
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
        Ok(data.claims)
    }

    /// Recovers claims from an access token without enforcing its lifetime
    ///
    /// Signature, issuer, audience, and algorithm checks still apply. This
    /// exists solely so the refresh flow can learn who an expired access
    /// token belonged to; it must never be used to authorize a request.
    pub fn extract_claims_ignoring_expiry(&self, token: &str) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.relaxed_validation)
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
        Ok(data.claims)
    }

    /// Exchanges an expired access token plus a live refresh token for a
    /// new pair
    ///
    /// The rotation itself is a single conditional store update: the
    /// presented refresh token must still be active and owned by the user
    /// named in the access token's claims, and revoking it and persisting
    /// the replacement happen in one atomic step. Every failure surfaces as
    /// `InvalidRefreshToken` and no partial token is handed out.
    pub async fn refresh_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        caller_ip: &str,
    ) -> Result<TokenPair, DomainError> {
        let claims = self
            .extract_claims_ignoring_expiry(access_token)
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?;

        // Mint the new pair up front; nothing is persisted until the
        // rotation below succeeds, so a failed precondition leaves no trace.
        let new_access_token =
            self.issue_access_token(user_id, &claims.email, claims.role, &claims.username)?;
        let new_token_value = Self::generate_refresh_token();
        let replacement = RefreshToken::new(
            user_id,
            Self::hash_token(&new_token_value),
            caller_ip.to_string(),
            self.config.jwt.refresh_token_expiry_days,
        );

        let old_hash = Self::hash_token(refresh_token);
        let rotated = self
            .repository
            .rotate_if_active(&old_hash, user_id, caller_ip, replacement)
            .await?;

        if !rotated {
            self.detect_reuse(&old_hash, user_id, caller_ip).await;
            return Err(DomainError::Token(TokenError::InvalidRefreshToken));
        }

        debug!(user_id, "rotated refresh token");

        Ok(TokenPair::new(
            new_access_token,
            new_token_value,
            self.config.jwt.access_token_expiry_minutes,
            self.config.jwt.refresh_token_expiry_days,
        ))
    }

    /// Revokes a refresh token (logout)
    ///
    /// # Returns
    /// * `Ok(true)` - Token revoked
    /// * `Ok(false)` - Token was not active to begin with
    pub async fn revoke_refresh_token(
        &self,
        refresh_token: &str,
        caller_ip: &str,
    ) -> Result<bool, DomainError> {
        let token_hash = Self::hash_token(refresh_token);
        self.repository.revoke_if_active(&token_hash, caller_ip).await
    }

    /// Revokes every outstanding refresh token for a user
    pub async fn revoke_all_tokens(
        &self,
        user_id: i64,
        caller_ip: &str,
    ) -> Result<usize, DomainError> {
        let revoked = self
            .repository
            .revoke_all_user_tokens(user_id, caller_ip)
            .await?;
        warn!(user_id, revoked, "revoked all refresh tokens for user");
        Ok(revoked)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to sign token: {}", e),
            }
        })
    }

    /// A presented-but-revoked refresh token is a reuse signal: someone is
    /// holding a credential that was already rotated away. When the policy
    /// is on, the whole session chain for that user goes down with it.
    async fn detect_reuse(&self, token_hash: &str, user_id: i64, caller_ip: &str) {
        if !self.config.revoke_on_reuse {
            return;
        }

        match self.repository.find_refresh_token(token_hash).await {
            Ok(Some(token)) if token.user_id == user_id && token.is_revoked => {
                warn!(
                    user_id,
                    token_id = %token.id,
                    "revoked refresh token presented again; revoking all sessions"
                );
                if let Err(error) = self
                    .repository
                    .revoke_all_user_tokens(user_id, caller_ip)
                    .await
                {
                    warn!(user_id, %error, "failed to revoke sessions after token reuse");
                }
            }
            _ => {}
        }
    }

    /// Generates an opaque refresh token: 32 cryptographically secure
    /// random bytes, base64-encoded. The value carries no structure; the
    /// store holds all the semantics.
    fn generate_refresh_token() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Generates a refresh token and stores its hash
    async fn issue_refresh_token(
        &self,
        user_id: i64,
        caller_ip: &str,
    ) -> Result<String, DomainError> {
        let token_value = Self::generate_refresh_token();
        let record = RefreshToken::new(
            user_id,
            Self::hash_token(&token_value),
            caller_ip.to_string(),
            self.config.jwt.refresh_token_expiry_days,
        );

        self.repository.save_refresh_token(record).await?;
        Ok(token_value)
    }

    /// Hashes a token for storage lookups
    pub(crate) fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
