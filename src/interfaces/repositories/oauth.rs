use async_trait::async_trait;

use crate::{
    entities::oauth::{OAuthProviderKind, OAuthUserInfo},
    errors::AuthError,
};

#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Provider consent page the browser is sent to.
    fn authorize_url(&self, provider: OAuthProviderKind, state: &str) -> Result<String, AuthError>;

    /// Exchanges an authorization code and reads the provider's user record.
    async fn fetch_user(&self, provider: OAuthProviderKind, code: &str) -> Result<OAuthUserInfo, AuthError>;

    fn is_enabled(&self, provider: OAuthProviderKind) -> bool;
}
