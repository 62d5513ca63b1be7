use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::validation::normalize_tags,
    entities::{
        admin::{AccountSummary, AdminUpdateUserRequest, PlatformStats, UserListQuery},
        pagination::{PageParams, Paginated},
        token::Claims,
    },
    errors::AppError,
    repositories::{admin::AdminRepository, profile::ProfileRepository, user::UserRepository},
};

pub struct AdminHandler<A, U, P>
where
    A: AdminRepository,
    U: UserRepository,
    P: ProfileRepository,
{
    pub admin_repo: A,
    pub user_repo: U,
    pub profile_repo: P,
}

impl<A, U, P> AdminHandler<A, U, P>
where
    A: AdminRepository,
    U: UserRepository,
    P: ProfileRepository,
{
    pub fn new(admin_repo: A, user_repo: U, profile_repo: P) -> Self {
        AdminHandler { admin_repo, user_repo, profile_repo }
    }

    pub async fn dashboard(&self) -> Result<PlatformStats, AppError> {
        self.admin_repo.dashboard_stats().await
    }

    pub async fn list_users(&self, query: &UserListQuery) -> Result<Paginated<AccountSummary>, AppError> {
        let search = query.search_term();
        let page = PageParams::new(query.page, query.per_page);

        let items = self.admin_repo.list_accounts(search.as_deref(), page).await?;
        let total = self.admin_repo.count_accounts(search.as_deref()).await?;
        Ok(Paginated::new(items, page, total))
    }

    pub async fn update_user(
        &self,
        claims: &Claims,
        id: &Uuid,
        request: AdminUpdateUserRequest,
    ) -> Result<AccountSummary, AppError> {
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        if *id == claims.user_id()? && request.is_admin == Some(false) {
            return Err(AppError::BadRequest("You cannot remove your own admin rights".to_string()));
        }

        if request.is_admin.is_some() || request.is_verified.is_some() {
            self.user_repo.update_flags(id, request.is_admin, request.is_verified).await?;
        }
        if let Some(badges) = request.badges {
            self.profile_repo.set_badges(id, &normalize_tags(badges)).await?;
        }

        tracing::info!(user_id = %id, admin = %claims.sub, "Account updated by admin");
        self.admin_repo
            .get_account(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn delete_user(&self, claims: &Claims, id: &Uuid) -> Result<(), AppError> {
        let admin_id = claims.user_id()?;
        if *id == admin_id {
            return Err(AppError::BadRequest("You cannot delete your own account here".to_string()));
        }

        self.user_repo.delete_user(id, &admin_id).await?;
        tracing::info!(user_id = %id, admin = %admin_id, "Account soft-deleted by admin");
        Ok(())
    }
}
