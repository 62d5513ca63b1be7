use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;

use crate::{
    entities::oauth::{OAuthProviderKind, OAuthUserInfo},
    errors::AuthError,
    repositories::oauth::OAuthClient,
    settings::{AppConfig, OAuthCredentials},
};

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const GITHUB_EMAILS_URL: &str = "https://api.github.com/user/emails";
const GITHUB_SCOPES: &str = "read:user user:email";

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const GOOGLE_SCOPES: &str = "openid email profile";

const USER_AGENT: &str = concat!("buildethiopia-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GithubUser {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GithubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct GoogleUser {
    pub sub: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GithubUser {
    /// Prefers the primary verified address from `/user/emails`.
    pub fn into_user_info(self, emails: &[GithubEmail]) -> OAuthUserInfo {
        let verified = emails
            .iter()
            .find(|e| e.primary && e.verified)
            .or_else(|| emails.iter().find(|e| e.verified));

        let (email, email_verified) = match verified {
            Some(e) => (Some(e.email.clone()), true),
            None => (self.email.clone(), false),
        };

        OAuthUserInfo {
            provider: OAuthProviderKind::Github,
            provider_user_id: self.id.to_string(),
            email,
            email_verified,
            name: self.name,
            login: Some(self.login),
            avatar_url: self.avatar_url,
            profile_url: self.html_url,
        }
    }
}

impl From<GoogleUser> for OAuthUserInfo {
    fn from(user: GoogleUser) -> Self {
        OAuthUserInfo {
            provider: OAuthProviderKind::Google,
            provider_user_id: user.sub,
            email: user.email,
            email_verified: user.email_verified,
            name: user.name,
            login: None,
            avatar_url: user.picture,
            profile_url: None,
        }
    }
}

/// Authorization-code flow against GitHub and Google over HTTPS.
#[derive(Clone)]
pub struct HttpOAuthClient {
    http: Client,
    github: Option<OAuthCredentials>,
    google: Option<OAuthCredentials>,
    public_url: String,
}

impl HttpOAuthClient {
    pub fn new(config: &AppConfig) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        HttpOAuthClient {
            http,
            github: config.oauth.github.clone().filter(OAuthCredentials::is_configured),
            google: config.oauth.google.clone().filter(OAuthCredentials::is_configured),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        }
    }

    fn credentials(&self, provider: OAuthProviderKind) -> Result<&OAuthCredentials, AuthError> {
        let creds = match provider {
            OAuthProviderKind::Github => self.github.as_ref(),
            OAuthProviderKind::Google => self.google.as_ref(),
        };
        creds.ok_or_else(|| AuthError::UnsupportedProvider(provider.to_string()))
    }

    fn redirect_uri(&self, provider: OAuthProviderKind) -> String {
        format!("{}/api/auth/oauth/{}/callback", self.public_url, provider)
    }

    async fn exchange_code(&self, provider: OAuthProviderKind, code: &str) -> Result<String, AuthError> {
        let creds = self.credentials(provider)?;
        let redirect_uri = self.redirect_uri(provider);

        let request = match provider {
            OAuthProviderKind::Github => self.http.post(GITHUB_TOKEN_URL).form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
            ]),
            OAuthProviderKind::Google => self.http.post(GOOGLE_TOKEN_URL).form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ]),
        };

        let response: TokenResponse = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .json()
            .await?;

        match response.access_token {
            Some(token) => Ok(token),
            None => {
                let reason = response
                    .error_description
                    .or(response.error)
                    .unwrap_or_else(|| "no access token returned".to_string());
                tracing::warn!(provider = %provider, "OAuth code exchange failed: {}", reason);
                Err(AuthError::OAuthProvider(reason))
            }
        }
    }

    async fn github_user(&self, access_token: &str) -> Result<OAuthUserInfo, AuthError> {
        let user: GithubUser = self.http
            .get(GITHUB_USER_URL)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // The emails endpoint needs the user:email scope; a refusal only costs us the address.
        let emails: Vec<GithubEmail> = match self.http
            .get(GITHUB_EMAILS_URL)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response.json().await.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not read GitHub emails: {}", e);
                Vec::new()
            }
        };

        Ok(user.into_user_info(&emails))
    }

    async fn google_user(&self, access_token: &str) -> Result<OAuthUserInfo, AuthError> {
        let user: GoogleUser = self.http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(user.into())
    }
}

#[async_trait]
impl OAuthClient for HttpOAuthClient {
    fn authorize_url(&self, provider: OAuthProviderKind, state: &str) -> Result<String, AuthError> {
        let creds = self.credentials(provider)?;
        let redirect_uri = self.redirect_uri(provider);

        let url = match provider {
            OAuthProviderKind::Github => url::Url::parse_with_params(GITHUB_AUTHORIZE_URL, &[
                ("client_id", creds.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", GITHUB_SCOPES),
                ("state", state),
            ]),
            OAuthProviderKind::Google => url::Url::parse_with_params(GOOGLE_AUTHORIZE_URL, &[
                ("client_id", creds.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
                ("state", state),
                ("prompt", "select_account"),
            ]),
        }
        .map_err(|e| AuthError::OAuthProvider(e.to_string()))?;

        Ok(url.to_string())
    }

    async fn fetch_user(&self, provider: OAuthProviderKind, code: &str) -> Result<OAuthUserInfo, AuthError> {
        let access_token = self.exchange_code(provider, code).await?;
        match provider {
            OAuthProviderKind::Github => self.github_user(&access_token).await,
            OAuthProviderKind::Google => self.google_user(&access_token).await,
        }
    }

    fn is_enabled(&self, provider: OAuthProviderKind) -> bool {
        self.credentials(provider).is_ok()
    }
}
