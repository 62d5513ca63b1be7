use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        comment::{CommentInsert, CommentListQuery, CommentRequest, CommentView},
        pagination::{PageParams, Paginated},
        token::Claims,
    },
    errors::AppError,
    repositories::{comment::CommentRepository, project::ProjectRepository},
};

pub struct CommentHandler<C, P>
where
    C: CommentRepository,
    P: ProjectRepository,
{
    pub comment_repo: C,
    pub project_repo: P,
}

fn sanitized(request: &CommentRequest) -> Result<String, AppError> {
    request
        .sanitized_content()
        .ok_or_else(|| AppError::validation("content", "Comment cannot be empty"))
}

impl<C, P> CommentHandler<C, P>
where
    C: CommentRepository,
    P: ProjectRepository,
{
    pub fn new(comment_repo: C, project_repo: P) -> Self {
        CommentHandler { comment_repo, project_repo }
    }

    async fn project_owner(&self, project_id: &Uuid) -> Result<Uuid, AppError> {
        self.project_repo
            .get_project_owner(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    async fn view(&self, id: &Uuid) -> Result<CommentView, AppError> {
        self.comment_repo
            .get_comment_view(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    pub async fn list_comments(
        &self,
        project_id: &Uuid,
        query: &CommentListQuery,
    ) -> Result<Paginated<CommentView>, AppError> {
        self.project_owner(project_id).await?;
        let page = PageParams::new(query.page, query.per_page);

        let items = self.comment_repo.list_comments(project_id, page).await?;
        let total = self.comment_repo.count_comments(project_id).await?;
        Ok(Paginated::new(items, page, total))
    }

    pub async fn create_comment(
        &self,
        claims: &Claims,
        project_id: &Uuid,
        request: CommentRequest,
    ) -> Result<CommentView, AppError> {
        request.validate()?;
        let content = sanitized(&request)?;
        self.project_owner(project_id).await?;

        let id = self.comment_repo
            .create_comment(&CommentInsert {
                project_id: *project_id,
                user_id: claims.user_id()?,
                content,
            })
            .await?;

        tracing::info!(comment_id = %id, project_id = %project_id, "Comment created");
        self.view(&id).await
    }

    /// Author only.
    pub async fn update_comment(&self, claims: &Claims, id: &Uuid, request: CommentRequest) -> Result<CommentView, AppError> {
        let comment = self.comment_repo
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.user_id != claims.user_id()? {
            return Err(AppError::Forbidden("You can only edit your own comments".to_string()));
        }

        request.validate()?;
        let content = sanitized(&request)?;
        self.comment_repo.update_comment(id, &content).await?;
        self.view(id).await
    }

    /// Author, project owner or admin.
    pub async fn delete_comment(&self, claims: &Claims, id: &Uuid) -> Result<(), AppError> {
        let comment = self.comment_repo
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let user_id = claims.user_id()?;
        let allowed = comment.user_id == user_id
            || claims.admin
            || self.project_repo.get_project_owner(&comment.project_id).await? == Some(user_id);
        if !allowed {
            return Err(AppError::Forbidden("You cannot delete this comment".to_string()));
        }

        self.comment_repo.delete_comment(id).await?;
        tracing::info!(comment_id = %id, deleted_by = %user_id, "Comment deleted");
        Ok(())
    }
}
