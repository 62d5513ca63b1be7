use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use uuid::Uuid;

use crate::{
    entities::featured::{FeaturedEntry, FeaturedProject},
    errors::AppError,
    repositories::sqlx_repo::SqlxFeaturedRepo,
};

#[async_trait]
pub trait FeaturedProjectRepository: Send + Sync {
    /// Inserts or restarts the featured window of a project.
    async fn feature_project(
        &self,
        project_id: &Uuid,
        featured_by: &Uuid,
        featured_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<FeaturedProject, AppError>;
    async fn unfeature_project(&self, project_id: &Uuid) -> Result<(), AppError>;
    /// Every row, expired ones included.
    async fn list_featured_entries(&self) -> Result<Vec<FeaturedEntry>, AppError>;
    async fn purge_expired_featured(&self) -> Result<u64, AppError>;
}

impl SqlxFeaturedRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxFeaturedRepo { pool }
    }
}

#[async_trait]
impl FeaturedProjectRepository for SqlxFeaturedRepo {
    async fn feature_project(
        &self,
        project_id: &Uuid,
        featured_by: &Uuid,
        featured_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<FeaturedProject, AppError> {
        sqlx::query_as::<_, FeaturedProject>(
            r#"
            INSERT INTO featured_projects (project_id, featured_by, featured_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id) DO UPDATE
            SET featured_by = EXCLUDED.featured_by,
                featured_at = EXCLUDED.featured_at,
                expires_at = EXCLUDED.expires_at
            RETURNING project_id, featured_by, featured_at, expires_at
            "#,
        )
        .bind(project_id)
        .bind(featured_by)
        .bind(featured_at)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23503")) => {
                AppError::NotFound("Project not found".to_string())
            }
            _ => AppError::from(e),
        })
    }

    async fn unfeature_project(&self, project_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM featured_projects WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project is not featured".to_string()));
        }
        Ok(())
    }

    async fn list_featured_entries(&self) -> Result<Vec<FeaturedEntry>, AppError> {
        let entries = sqlx::query_as::<_, FeaturedEntry>(
            r#"
            SELECT f.project_id, p.title, f.featured_by, f.featured_at, f.expires_at,
                   f.expires_at > NOW() AS active
            FROM featured_projects f
            JOIN projects p ON p.id = f.project_id
            ORDER BY f.featured_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn purge_expired_featured(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM featured_projects WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
