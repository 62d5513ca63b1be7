use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_FEATURED_LIMIT, MAX_FEATURED_LIMIT},
    entities::{
        featured::{FeatureProjectRequest, FeaturedEntry, FeaturedProject, FeaturedQuery},
        pagination::{PageParams, Paginated},
        project::{
            NewProjectRequest, Project, ProjectChanges, ProjectDetail, ProjectFilter,
            ProjectListQuery, UpdateProjectRequest,
        },
        token::Claims,
    },
    errors::AppError,
    repositories::{featured::FeaturedProjectRepository, project::ProjectRepository, upvote::UpvoteRepository},
    utils::markdown::render_markdown,
};

pub struct ProjectHandler<P, F, U>
where
    P: ProjectRepository,
    F: FeaturedProjectRepository,
    U: UpvoteRepository,
{
    pub project_repo: P,
    pub featured_repo: F,
    pub upvote_repo: U,
    pub featured_default_days: i64,
}

impl<P, F, U> ProjectHandler<P, F, U>
where
    P: ProjectRepository,
    F: FeaturedProjectRepository,
    U: UpvoteRepository,
{
    pub fn new(project_repo: P, featured_repo: F, upvote_repo: U, featured_default_days: i64) -> Self {
        ProjectHandler {
            project_repo,
            featured_repo,
            upvote_repo,
            featured_default_days,
        }
    }

    pub async fn list_projects(&self, query: &ProjectListQuery) -> Result<Paginated<Project>, AppError> {
        let filter = ProjectFilter::from(query);
        let page = PageParams::new(query.page, query.per_page);

        let items = self.project_repo.list_projects(&filter, page).await?;
        let total = self.project_repo.count_projects(&filter).await?;
        Ok(Paginated::new(items, page, total))
    }

    pub async fn developer_projects(
        &self,
        developer_id: &Uuid,
        query: &ProjectListQuery,
    ) -> Result<Paginated<Project>, AppError> {
        let mut filter = ProjectFilter::from(query);
        filter.developer_id = Some(*developer_id);
        let page = PageParams::new(query.page, query.per_page);

        let items = self.project_repo.list_projects(&filter, page).await?;
        let total = self.project_repo.count_projects(&filter).await?;
        Ok(Paginated::new(items, page, total))
    }

    async fn find_project(&self, id: &Uuid) -> Result<Project, AppError> {
        self.project_repo
            .get_project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    /// Project with rendered description; `upvoted` is false for anonymous viewers.
    pub async fn get_project(&self, id: &Uuid, viewer: Option<Uuid>) -> Result<ProjectDetail, AppError> {
        let project = self.find_project(id).await?;
        let upvoted = match viewer {
            Some(user_id) => self.upvote_repo.has_upvoted(&user_id, id).await?,
            None => false,
        };

        Ok(ProjectDetail {
            description_html: render_markdown(&project.description),
            project,
            upvoted,
        })
    }

    pub async fn create_project(&self, claims: &Claims, request: NewProjectRequest) -> Result<Project, AppError> {
        if !claims.can_publish_projects() {
            return Err(AppError::Forbidden("Only developers can publish projects".to_string()));
        }
        request.validate()?;

        let developer_id = claims.user_id()?;
        let project = self.project_repo.create_project(&request.into_insert(developer_id)).await?;

        tracing::info!(project_id = %project.id, developer_id = %developer_id, "Project created");
        Ok(project)
    }

    async fn owner_of(&self, id: &Uuid) -> Result<Uuid, AppError> {
        self.project_repo
            .get_project_owner(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    pub async fn update_project(
        &self,
        claims: &Claims,
        id: &Uuid,
        request: UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        let owner = self.owner_of(id).await?;
        if owner != claims.user_id()? {
            tracing::warn!(user_id = %claims.sub, project_id = %id, "Rejected update of another user's project");
            return Err(AppError::Forbidden("You can only update your own projects".to_string()));
        }

        request.validate()?;
        let changes = ProjectChanges::from(request);
        if changes == ProjectChanges::default() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        self.project_repo.update_project(id, &changes).await
    }

    /// Owner or admin; comments, upvotes and the featured row go with it.
    pub async fn delete_project(&self, claims: &Claims, id: &Uuid) -> Result<(), AppError> {
        let owner = self.owner_of(id).await?;
        if owner != claims.user_id()? && !claims.admin {
            return Err(AppError::Forbidden("You can only delete your own projects".to_string()));
        }

        self.project_repo.delete_project(id).await?;
        tracing::info!(project_id = %id, deleted_by = %claims.sub, "Project deleted");
        Ok(())
    }

    pub async fn featured_projects(&self, query: &FeaturedQuery) -> Result<Vec<Project>, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT).clamp(1, MAX_FEATURED_LIMIT);
        self.project_repo.list_featured_projects(limit as i64).await
    }

    pub async fn feature_project(
        &self,
        claims: &Claims,
        id: &Uuid,
        request: FeatureProjectRequest,
    ) -> Result<FeaturedProject, AppError> {
        request.validate()?;
        self.find_project(id).await?;

        let (featured_at, expires_at) = request.window(Utc::now(), self.featured_default_days);
        let featured = self.featured_repo
            .feature_project(id, &claims.user_id()?, featured_at, expires_at)
            .await?;

        tracing::info!(project_id = %id, expires_at = %expires_at, "Project featured");
        Ok(featured)
    }

    pub async fn unfeature_project(&self, id: &Uuid) -> Result<(), AppError> {
        self.featured_repo.unfeature_project(id).await?;
        tracing::info!(project_id = %id, "Project unfeatured");
        Ok(())
    }

    pub async fn featured_entries(&self) -> Result<Vec<FeaturedEntry>, AppError> {
        self.featured_repo.list_featured_entries().await
    }
}
