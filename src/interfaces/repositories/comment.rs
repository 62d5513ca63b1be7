use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{
        comment::{Comment, CommentInsert, CommentView},
        pagination::PageParams,
    },
    errors::AppError,
    repositories::sqlx_repo::{ensure_active_account, SqlxCommentRepo},
};

const COMMENT_VIEW_SELECT: &str = r#"
    SELECT c.id, c.project_id, c.user_id, c.content,
           pr.username AS author_username,
           pr.name AS author_name,
           pr.avatar_url AS author_avatar_url,
           c.created_at, c.updated_at
    FROM comments c
    JOIN profiles pr ON pr.id = c.user_id
    JOIN users u ON u.id = pr.id AND u.deleted_at IS NULL
"#;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Oldest first.
    async fn list_comments(&self, project_id: &Uuid, page: PageParams) -> Result<Vec<CommentView>, AppError>;
    async fn count_comments(&self, project_id: &Uuid) -> Result<i64, AppError>;
    async fn get_comment(&self, id: &Uuid) -> Result<Option<Comment>, AppError>;
    async fn get_comment_view(&self, id: &Uuid) -> Result<Option<CommentView>, AppError>;
    /// Inserts the comment and bumps `comments_count` in one transaction.
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Uuid, AppError>;
    async fn update_comment(&self, id: &Uuid, content: &str) -> Result<(), AppError>;
    /// Deletes the comment and decrements `comments_count` in one transaction.
    async fn delete_comment(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxCommentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxCommentRepo { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepo {
    async fn list_comments(&self, project_id: &Uuid, page: PageParams) -> Result<Vec<CommentView>, AppError> {
        let sql = format!(
            "{COMMENT_VIEW_SELECT} WHERE c.project_id = $1 ORDER BY c.created_at ASC, c.id LIMIT $2 OFFSET $3"
        );
        let comments = sqlx::query_as::<_, CommentView>(&sql)
            .bind(project_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    async fn count_comments(&self, project_id: &Uuid) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM comments c
            JOIN users u ON u.id = c.user_id AND u.deleted_at IS NULL
            WHERE c.project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn get_comment(&self, id: &Uuid) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, project_id, user_id, content, created_at, updated_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn get_comment_view(&self, id: &Uuid) -> Result<Option<CommentView>, AppError> {
        let sql = format!("{COMMENT_VIEW_SELECT} WHERE c.id = $1");
        let comment = sqlx::query_as::<_, CommentView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn create_comment(&self, comment: &CommentInsert) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;
        ensure_active_account(&mut *tx, &comment.user_id).await?;

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO comments (project_id, user_id, content) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(comment.project_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::NotFound("Project not found".to_string()),
            other => other,
        })?;

        sqlx::query("UPDATE projects SET comments_count = comments_count + 1 WHERE id = $1")
            .bind(comment.project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update_comment(&self, id: &Uuid, content: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE comments c SET content = $2, updated_at = NOW()
            FROM users u
            WHERE c.id = $1 AND u.id = c.user_id AND u.deleted_at IS NULL
            "#,
        )
            .bind(id)
            .bind(content)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }
        Ok(())
    }

    async fn delete_comment(&self, id: &Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let project_id: Option<Uuid> = sqlx::query_scalar("DELETE FROM comments WHERE id = $1 RETURNING project_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project_id) = project_id else {
            return Err(AppError::NotFound("Comment not found".to_string()));
        };

        sqlx::query("UPDATE projects SET comments_count = GREATEST(comments_count - 1, 0) WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
