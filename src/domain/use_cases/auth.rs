use chrono::Utc;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::entities::token::{AuthResponse, Claims};
use crate::entities::user::{LoginUser, NewUser, NewUserResponse, User};
use crate::errors::{AppError, AuthError};
use crate::repositories::token::{TokenRevocationRepository, TokenServiceRepository};
use crate::repositories::user::UserRepository;

pub struct AuthHandler<R, T, S>
where
    R: UserRepository,
    T: TokenServiceRepository,
    S: TokenRevocationRepository,
{
    pub user_repo: R,
    pub token_service: T,
    pub revocations: S,
}

/// Issues a fresh access/refresh pair for `user`.
pub fn issue_token_pair<T: TokenServiceRepository>(token_service: &T, user: &User) -> Result<AuthResponse, AuthError> {
    let access_token = token_service.create_jwt(user)
        .map_err(|e| {
            tracing::warn!("Failed to create JWT: {}", e);
            AuthError::TokenCreation
        })?;

    let refresh_token = token_service.create_refresh_jwt(&user.id)
        .map_err(|e| {
            tracing::warn!("Failed to create refresh JWT: {}", e);
            AuthError::TokenCreation
        })?;
    Ok(AuthResponse::new(access_token, refresh_token))
}

/// Seconds until a token with expiry `exp` lapses.
pub(crate) fn remaining_secs(exp: usize) -> u64 {
    (exp as i64 - Utc::now().timestamp()).max(0) as u64
}

impl<R, T, S> AuthHandler<R, T, S>
where
    R: UserRepository,
    T: TokenServiceRepository,
    S: TokenRevocationRepository,
{
    pub fn new(user_repo: R, token_service: T, revocations: S) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            revocations,
        }
    }

    /// Registers a new account and its profile after validation and password hashing
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let (user_insert, profile_insert) = request.prepare_for_insert(hashed_password);

        let id = self.user_repo
            .create_user_with_profile(&user_insert, &profile_insert, None)
            .await?;

        tracing::info!(user_id = %id, "Account registered");
        Ok(NewUserResponse {
            id,
            message: "User created successfully".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        // OAuth-only accounts have no password to check against.
        let Some(password_hash) = user.password_hash.as_deref() else {
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&request.password, password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        issue_token_pair(&self.token_service, user)
    }

    /// Rotates the refresh token: the presented one is revoked and a new pair issued.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.decode_refresh_jwt(token)?.claims;

        if self.revocations.is_revoked(&claims.jti).await? {
            tracing::warn!("Revoked refresh token presented");
            return Err(AuthError::TokenRevoked);
        }

        let user_id = uuid::Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.revocations.revoke(&claims.jti, remaining_secs(claims.exp)).await?;
        self.create_auth_response(&user)
    }

    /// Revokes the caller's access token and the refresh token they hand in.
    pub async fn logout(&self, access: &Claims, refresh_token: &str) -> Result<(), AuthError> {
        let refresh = self.token_service.decode_refresh_jwt(refresh_token)?.claims;
        if refresh.sub != access.sub {
            tracing::warn!(user_id = %access.sub, "Logout with another user's refresh token");
            return Err(AuthError::InvalidToken);
        }

        self.revocations.revoke(&access.jti, remaining_secs(access.exp)).await?;
        self.revocations.revoke(&refresh.jti, remaining_secs(refresh.exp)).await?;

        tracing::info!(user_id = %access.sub, "User logged out");
        Ok(())
    }

    pub async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        self.revocations.is_revoked(jti).await
    }
}
