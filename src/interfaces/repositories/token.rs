use async_trait::async_trait;
use jsonwebtoken::TokenData;
use uuid::Uuid;
use crate::{entities::{token::{Claims, RefreshClaims}, user::User}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Creates a new JWT for the user
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Creates a new refresh JWT for the user
    fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError>;

    /// Decodes a JWT and returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;

    /// Decodes a refresh JWT and returns the claims
    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError>;

    /// Signs the `state` parameter for an OAuth redirect
    fn create_oauth_state(&self, provider: &str) -> Result<String, AuthError>;

    /// Checks an OAuth `state` came from us, is fresh and targets `provider`
    fn verify_oauth_state(&self, state: &str, provider: &str) -> Result<(), AuthError>;
}

/// Deny-list of token ids (`jti`) that were logged out before expiring.
#[async_trait]
pub trait TokenRevocationRepository: Send + Sync {
    /// Remembers `jti` for `ttl_secs`, after which the token would have expired anyway.
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AuthError>;

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError>;

    /// `None` when no store is configured.
    async fn ping(&self) -> Option<bool>;
}
