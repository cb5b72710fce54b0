//! Configuration for the token service

use sf_shared::config::JwtConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing configuration
    pub jwt: JwtConfig,

    /// Revoke every outstanding token for a user when a revoked refresh
    /// token is presented again (reuse detection)
    pub revoke_on_reuse: bool,
}

impl TokenServiceConfig {
    /// Create a token service configuration with reuse detection enabled
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            jwt,
            revoke_on_reuse: true,
        }
    }

    /// Disable the reuse-detection revocation policy
    pub fn without_reuse_revocation(mut self) -> Self {
        self.revoke_on_reuse = false;
        self
    }
}
