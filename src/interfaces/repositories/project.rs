use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        pagination::PageParams,
        project::{Project, ProjectChanges, ProjectFilter, ProjectInsert},
    },
    errors::AppError,
    repositories::sqlx_repo::{ensure_active_account, escape_like, push_patch, SqlxProjectRepo},
};

const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.title, p.description, p.tech_stack, p.github_url, p.live_url,
           p.thumbnail_url, p.media_urls, p.developer_id,
           pr.username AS developer_username,
           pr.name AS developer_name,
           pr.avatar_url AS developer_avatar_url,
           p.upvotes_count, p.comments_count,
           EXISTS (
               SELECT 1 FROM featured_projects f
               WHERE f.project_id = p.id AND f.expires_at > NOW()
           ) AS is_featured,
           p.created_at, p.updated_at
    FROM projects p
    JOIN profiles pr ON pr.id = p.developer_id
    JOIN users u ON u.id = pr.id AND u.deleted_at IS NULL
"#;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
    /// Developer id of a visible project.
    async fn get_project_owner(&self, id: &Uuid) -> Result<Option<Uuid>, AppError>;
    async fn list_projects(&self, filter: &ProjectFilter, page: PageParams) -> Result<Vec<Project>, AppError>;
    async fn count_projects(&self, filter: &ProjectFilter) -> Result<i64, AppError>;
    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    /// Projects with an active featured row, most recently featured first.
    async fn list_featured_projects(&self, limit: i64) -> Result<Vec<Project>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a ProjectFilter) {
    builder.push(" WHERE TRUE");
    if let Some(developer_id) = &filter.developer_id {
        builder.push(" AND p.developer_id = ").push_bind(developer_id);
    }
    if let Some(tech) = &filter.tech {
        builder.push(" AND ").push_bind(tech).push(" = ANY(p.tech_stack)");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;
        ensure_active_account(&mut *tx, &project.developer_id).await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO projects (
                title, description, tech_stack, github_url, live_url,
                thumbnail_url, media_urls, developer_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.thumbnail_url)
        .bind(&project.media_urls)
        .bind(project.developer_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_project_by_id(&id)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Project {id} vanished after insert")))
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let sql = format!("{PROJECT_SELECT} WHERE p.id = $1");
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project)
    }

    async fn get_project_owner(&self, id: &Uuid) -> Result<Option<Uuid>, AppError> {
        let owner: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT p.developer_id FROM projects p
            JOIN users u ON u.id = p.developer_id AND u.deleted_at IS NULL
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    async fn list_projects(&self, filter: &ProjectFilter, page: PageParams) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(PROJECT_SELECT);
        push_filters(&mut builder, filter);
        builder
            .push(filter.sort.order_by())
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn count_projects(&self, filter: &ProjectFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM projects p JOIN users u ON u.id = p.developer_id AND u.deleted_at IS NULL",
        );
        push_filters(&mut builder, filter);

        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE projects SET ");
        {
            let mut set = builder.separated(", ");
            set.push("updated_at = NOW()");

            if let Some(title) = &changes.title {
                set.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = &changes.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(tech_stack) = &changes.tech_stack {
                set.push("tech_stack = ").push_bind_unseparated(tech_stack);
            }
            push_patch(&mut set, "github_url", &changes.github_url);
            push_patch(&mut set, "live_url", &changes.live_url);
            push_patch(&mut set, "thumbnail_url", &changes.thumbnail_url);
            if let Some(media_urls) = &changes.media_urls {
                set.push("media_urls = ").push_bind_unseparated(media_urls);
            }
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        self.get_project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }
        Ok(())
    }

    async fn list_featured_projects(&self, limit: i64) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            "{PROJECT_SELECT} JOIN featured_projects fp ON fp.project_id = p.id AND fp.expires_at > NOW() \
             ORDER BY fp.featured_at DESC, p.id LIMIT $1"
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }
}
