use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entities::profile::ProfileRole, errors::AuthError};

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    OauthState,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub username: String,
    pub role: ProfileRole,
    pub admin: bool,
    pub verified: bool,
    pub jti: String,
    pub token_type: TokenType,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidUserId)
    }

    /// Developers publish projects; admins may act on anyone's behalf.
    pub fn can_publish_projects(&self) -> bool {
        self.admin || self.role == ProfileRole::Developer
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub token_type: TokenType,
    pub iat: usize,
    pub exp: usize,
}

/// Signed `state` parameter round-tripped through an OAuth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthStateClaims {
    pub provider: String,
    pub nonce: String,
    pub token_type: TokenType,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}
