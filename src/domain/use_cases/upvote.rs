use uuid::Uuid;

use crate::{
    entities::{token::Claims, upvote::UpvoteStatus},
    errors::AppError,
    repositories::{project::ProjectRepository, upvote::UpvoteRepository},
};

pub struct UpvoteHandler<U, P>
where
    U: UpvoteRepository,
    P: ProjectRepository,
{
    pub upvote_repo: U,
    pub project_repo: P,
}

impl<U, P> UpvoteHandler<U, P>
where
    U: UpvoteRepository,
    P: ProjectRepository,
{
    pub fn new(upvote_repo: U, project_repo: P) -> Self {
        UpvoteHandler { upvote_repo, project_repo }
    }

    async fn ensure_project(&self, project_id: &Uuid) -> Result<(), AppError> {
        match self.project_repo.get_project_owner(project_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Project not found".to_string())),
        }
    }

    pub async fn status(&self, project_id: &Uuid, viewer: Option<Uuid>) -> Result<UpvoteStatus, AppError> {
        self.ensure_project(project_id).await?;

        let upvotes_count = self.upvote_repo
            .upvotes_count(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
        let upvoted = match viewer {
            Some(user_id) => self.upvote_repo.has_upvoted(&user_id, project_id).await?,
            None => false,
        };

        Ok(UpvoteStatus {
            project_id: *project_id,
            upvoted,
            upvotes_count,
        })
    }

    /// A repeated upvote is rejected and leaves the counter untouched.
    pub async fn upvote(&self, claims: &Claims, project_id: &Uuid) -> Result<UpvoteStatus, AppError> {
        let user_id = claims.user_id()?;
        self.ensure_project(project_id).await?;

        match self.upvote_repo.add_upvote(&user_id, project_id).await? {
            Some(upvotes_count) => Ok(UpvoteStatus {
                project_id: *project_id,
                upvoted: true,
                upvotes_count,
            }),
            None => Err(AppError::Conflict("Project already upvoted".to_string())),
        }
    }

    pub async fn remove_upvote(&self, claims: &Claims, project_id: &Uuid) -> Result<UpvoteStatus, AppError> {
        let user_id = claims.user_id()?;
        self.ensure_project(project_id).await?;

        match self.upvote_repo.remove_upvote(&user_id, project_id).await? {
            Some(upvotes_count) => Ok(UpvoteStatus {
                project_id: *project_id,
                upvoted: false,
                upvotes_count,
            }),
            None => Err(AppError::NotFound("Upvote not found".to_string())),
        }
    }
}
