use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        pagination::{PageParams, Paginated},
        profile::{Profile, ProfileChanges, ProfileFilter, ProfileListQuery, UpdateProfileRequest},
        token::Claims,
        user::{MeResponse, PublicUser},
    },
    errors::AppError,
    repositories::{profile::ProfileRepository, token::TokenRevocationRepository, user::UserRepository},
    use_cases::auth::remaining_secs,
};

pub struct ProfileHandler<P, U, S>
where
    P: ProfileRepository,
    U: UserRepository,
    S: TokenRevocationRepository,
{
    pub profile_repo: P,
    pub user_repo: U,
    pub revocations: S,
}

impl<P, U, S> ProfileHandler<P, U, S>
where
    P: ProfileRepository,
    U: UserRepository,
    S: TokenRevocationRepository,
{
    pub fn new(profile_repo: P, user_repo: U, revocations: S) -> Self {
        ProfileHandler { profile_repo, user_repo, revocations }
    }

    pub async fn me(&self, claims: &Claims) -> Result<MeResponse, AppError> {
        let user_id = claims.user_id()?;
        let user = self.user_repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let profile = self.get_profile(&user_id).await?;

        Ok(MeResponse {
            account: PublicUser::from(user),
            profile,
        })
    }

    pub async fn get_profile(&self, id: &Uuid) -> Result<Profile, AppError> {
        self.profile_repo
            .get_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    pub async fn get_profile_by_username(&self, username: &str) -> Result<Profile, AppError> {
        self.profile_repo
            .get_profile_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    pub async fn list_profiles(&self, query: &ProfileListQuery) -> Result<Paginated<Profile>, AppError> {
        let filter = ProfileFilter::from(query);
        let page = PageParams::new(query.page, query.per_page);

        let items = self.profile_repo.list_profiles(&filter, page).await?;
        let total = self.profile_repo.count_profiles(&filter).await?;
        Ok(Paginated::new(items, page, total))
    }

    /// Owner-only partial update.
    pub async fn update_profile(
        &self,
        claims: &Claims,
        id: &Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        if claims.user_id()? != *id {
            tracing::warn!(user_id = %claims.sub, profile_id = %id, "Rejected update of another user's profile");
            return Err(AppError::Forbidden("You can only update your own profile".to_string()));
        }

        request.validate()?;
        if request.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let current = self.get_profile(id).await?;
        let changes = ProfileChanges::from(request);

        if let Some(username) = &changes.username {
            if *username != current.username && self.user_repo.username_exists(username).await? {
                return Err(AppError::Conflict("Username is already taken".to_string()));
            }
        }

        let profile = self.profile_repo.update_profile(id, &changes).await?;
        tracing::info!(profile_id = %id, "Profile updated");
        Ok(profile)
    }

    /// Soft-deletes an account; allowed for the owner and for admins.
    /// Deleting your own account also revokes the access token used to do it.
    pub async fn delete_account(&self, claims: &Claims, id: &Uuid) -> Result<(), AppError> {
        let actor = claims.user_id()?;
        if actor != *id && !claims.admin {
            return Err(AppError::Forbidden("You can only delete your own account".to_string()));
        }

        self.user_repo.delete_user(id, &actor).await?;
        tracing::info!(user_id = %id, deleted_by = %actor, "Account soft-deleted");

        if actor == *id {
            if let Err(e) = self.revocations.revoke(&claims.jti, remaining_secs(claims.exp)).await {
                tracing::warn!(user_id = %id, error = %e, "Could not revoke the deleted account's token");
            }
        }
        Ok(())
    }
}
