use chrono::Utc;
use rand::Rng;
use std::str::FromStr;

use crate::{
    entities::{
        oauth::{OAuthCallbackQuery, OAuthProviderKind, OAuthUserInfo},
        profile::{ProfileInsert, ProfileRole, SocialLinks},
        token::AuthResponse,
        user::{User, UserInsert},
    },
    errors::{AppError, AuthError},
    repositories::{
        oauth::OAuthClient,
        token::TokenServiceRepository,
        user::{IdentityRef, UserRepository},
    },
    use_cases::auth::issue_token_pair,
};

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_BASE: usize = 24;
const USERNAME_ATTEMPTS: usize = 10;

pub struct OAuthHandler<R, T, C>
where
    R: UserRepository,
    T: TokenServiceRepository,
    C: OAuthClient,
{
    pub user_repo: R,
    pub token_service: T,
    pub client: C,
}

/// Turns a provider login or display name into a valid username stem.
pub fn username_stem(candidate: &str) -> String {
    let mut stem: String = slug::slugify(candidate)
        .chars()
        .map(|c| if c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .take(MAX_USERNAME_BASE)
        .collect();

    stem = stem.trim_matches('_').to_string();
    if stem.len() < MIN_USERNAME_LENGTH {
        stem = format!("dev_{stem}").trim_end_matches('_').to_string();
    }
    stem
}

impl<R, T, C> OAuthHandler<R, T, C>
where
    R: UserRepository,
    T: TokenServiceRepository,
    C: OAuthClient,
{
    pub fn new(user_repo: R, token_service: T, client: C) -> Self {
        OAuthHandler {
            user_repo,
            token_service,
            client,
        }
    }

    fn provider(&self, name: &str) -> Result<OAuthProviderKind, AuthError> {
        let provider = OAuthProviderKind::from_str(name)?;
        if !self.client.is_enabled(provider) {
            return Err(AuthError::UnsupportedProvider(provider.to_string()));
        }
        Ok(provider)
    }

    /// Provider consent URL carrying a signed `state`.
    pub fn start(&self, provider: &str) -> Result<String, AuthError> {
        let provider = self.provider(provider)?;
        let state = self.token_service.create_oauth_state(provider.as_str())?;
        self.client.authorize_url(provider, &state)
    }

    pub async fn callback(&self, provider: &str, query: OAuthCallbackQuery) -> Result<AuthResponse, AppError> {
        let provider = self.provider(provider)?;

        if let Some(error) = query.error {
            tracing::warn!(%provider, "OAuth sign-in refused: {} {:?}", error, query.error_description);
            return Err(AuthError::AuthenticationFailed.into());
        }

        let state = query.state.ok_or(AuthError::InvalidOAuthState)?;
        self.token_service.verify_oauth_state(&state, provider.as_str())?;

        let code = query.code.ok_or(AuthError::MissingCredentials)?;
        let info = self.client.fetch_user(provider, &code).await?;

        let user = self.resolve_user(&info).await?;
        tracing::info!(user_id = %user.id, %provider, "OAuth sign-in");
        Ok(issue_token_pair(&self.token_service, &user)?)
    }

    /// Linked identity first, then an account with the same verified email, else a new account.
    async fn resolve_user(&self, info: &OAuthUserInfo) -> Result<User, AppError> {
        let identity = IdentityRef {
            provider: info.provider.as_str(),
            provider_user_id: &info.provider_user_id,
        };

        if let Some(user) = self.user_repo.find_user_by_identity(identity).await? {
            return Ok(user);
        }

        let email = info
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                tracing::warn!(provider = %info.provider, "OAuth account without an email address");
                AppError::from(AuthError::AuthenticationFailed)
            })?;

        if let Some(user) = self.user_repo.get_user_by_email(&email).await? {
            if !info.email_verified {
                return Err(AppError::Conflict(
                    "An account with this email already exists; sign in with your password".to_string(),
                ));
            }
            self.user_repo.link_identity(&user.id, identity).await?;
            tracing::info!(user_id = %user.id, provider = %info.provider, "Linked OAuth identity by email");
            return Ok(user);
        }

        let username = self.available_username(info, &email).await?;
        let now = Utc::now();
        let user_insert = UserInsert {
            email,
            password_hash: None,
            is_admin: false,
            is_verified: info.email_verified,
            created_at: now,
            updated_at: now,
        };
        let profile_insert = ProfileInsert {
            name: info.name.clone().or_else(|| info.login.clone()).unwrap_or_else(|| username.clone()),
            username,
            role: ProfileRole::Developer,
            avatar_url: info.avatar_url.clone(),
            social_links: SocialLinks {
                github: match info.provider {
                    OAuthProviderKind::Github => info.profile_url.clone(),
                    OAuthProviderKind::Google => None,
                },
                ..SocialLinks::default()
            },
        };

        let id = self.user_repo
            .create_user_with_profile(&user_insert, &profile_insert, Some(identity))
            .await?;

        self.user_repo
            .get_user_by_id(&id)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Account {id} missing after OAuth sign-up")))
    }

    async fn available_username(&self, info: &OAuthUserInfo, email: &str) -> Result<String, AppError> {
        let candidate = info
            .login
            .as_deref()
            .or(info.name.as_deref())
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email));
        let stem = username_stem(candidate);

        if !self.user_repo.username_exists(&stem).await? {
            return Ok(stem);
        }
        for _ in 0..USERNAME_ATTEMPTS {
            let suffix: u16 = rand::thread_rng().gen_range(1..10_000);
            let username = format!("{stem}_{suffix}");
            if !self.user_repo.username_exists(&username).await? {
                return Ok(username);
            }
        }
        Err(AppError::Conflict("Could not find a free username".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_are_valid_usernames() {
        assert_eq!(username_stem("Abebe-Kebede"), "abebe_kebede");
        assert_eq!(username_stem("Selam Tesfaye"), "selam_tesfaye");
        assert_eq!(username_stem("x"), "dev_x");
        assert_eq!(username_stem("!!"), "dev");
    }

    #[test]
    fn stems_leave_room_for_a_suffix() {
        let stem = username_stem(&"a".repeat(60));
        assert_eq!(stem.len(), MAX_USERNAME_BASE);
        assert!(format!("{stem}_9999").len() <= 30);
    }
}
