use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppError,
    repositories::sqlx_repo::{ensure_active_account, SqlxUpvoteRepo},
};

#[async_trait]
pub trait UpvoteRepository: Send + Sync {
    async fn has_upvoted(&self, user_id: &Uuid, project_id: &Uuid) -> Result<bool, AppError>;
    /// New `upvotes_count`, or `None` when the user had already upvoted.
    async fn add_upvote(&self, user_id: &Uuid, project_id: &Uuid) -> Result<Option<i32>, AppError>;
    /// New `upvotes_count`, or `None` when there was nothing to remove.
    async fn remove_upvote(&self, user_id: &Uuid, project_id: &Uuid) -> Result<Option<i32>, AppError>;
    async fn upvotes_count(&self, project_id: &Uuid) -> Result<Option<i32>, AppError>;
}

impl SqlxUpvoteRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUpvoteRepo { pool }
    }
}

#[async_trait]
impl UpvoteRepository for SqlxUpvoteRepo {
    async fn has_upvoted(&self, user_id: &Uuid, project_id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM upvotes WHERE user_id = $1 AND project_id = $2)",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add_upvote(&self, user_id: &Uuid, project_id: &Uuid) -> Result<Option<i32>, AppError> {
        let mut tx = self.pool.begin().await?;
        ensure_active_account(&mut *tx, user_id).await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO upvotes (user_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, project_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::NotFound("Project not found".to_string()),
            other => other,
        })?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let count: i32 = sqlx::query_scalar(
            "UPDATE projects SET upvotes_count = upvotes_count + 1 WHERE id = $1 RETURNING upvotes_count",
        )
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(count))
    }

    async fn remove_upvote(&self, user_id: &Uuid, project_id: &Uuid) -> Result<Option<i32>, AppError> {
        let mut tx = self.pool.begin().await?;
        ensure_active_account(&mut *tx, user_id).await?;

        let removed = sqlx::query("DELETE FROM upvotes WHERE user_id = $1 AND project_id = $2")
            .bind(user_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let count: i32 = sqlx::query_scalar(
            r#"
            UPDATE projects SET upvotes_count = GREATEST(upvotes_count - 1, 0)
            WHERE id = $1
            RETURNING upvotes_count
            "#,
        )
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(count))
    }

    async fn upvotes_count(&self, project_id: &Uuid) -> Result<Option<i32>, AppError> {
        let count: Option<i32> = sqlx::query_scalar("SELECT upvotes_count FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(count)
    }
}
