use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{admin::{AccountSummary, PlatformStats}, pagination::PageParams},
    errors::AppError,
    repositories::sqlx_repo::{escape_like, SqlxAdminRepo},
};

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn dashboard_stats(&self) -> Result<PlatformStats, AppError>;
    async fn list_accounts(&self, search: Option<&str>, page: PageParams) -> Result<Vec<AccountSummary>, AppError>;
    async fn count_accounts(&self, search: Option<&str>) -> Result<i64, AppError>;
    async fn get_account(&self, id: &Uuid) -> Result<Option<AccountSummary>, AppError>;
}

impl SqlxAdminRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAdminRepo { pool }
    }
}

fn push_search(builder: &mut QueryBuilder<'_, Postgres>, search: Option<&str>) {
    builder.push(" WHERE u.deleted_at IS NULL");
    if let Some(search) = search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (u.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

const ACCOUNT_SELECT: &str = r#"
    SELECT u.id, u.email, p.username, p.name, p.role, u.is_admin, u.is_verified, p.badges,
           (SELECT COUNT(*) FROM projects pj WHERE pj.developer_id = u.id) AS projects_count,
           u.created_at
    FROM users u
    JOIN profiles p ON p.id = u.id
"#;

#[async_trait]
impl AdminRepository for SqlxAdminRepo {
    async fn dashboard_stats(&self) -> Result<PlatformStats, AppError> {
        let stats = sqlx::query_as::<_, PlatformStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE deleted_at IS NULL) AS users,
                (SELECT COUNT(*) FROM profiles p JOIN users u ON u.id = p.id
                    WHERE u.deleted_at IS NULL AND p.role = 'developer') AS developers,
                (SELECT COUNT(*) FROM profiles p JOIN users u ON u.id = p.id
                    WHERE u.deleted_at IS NULL AND p.role = 'recruiter') AS recruiters,
                (SELECT COUNT(*) FROM projects) AS projects,
                (SELECT COUNT(*) FROM comments) AS comments,
                (SELECT COUNT(*) FROM upvotes) AS upvotes,
                (SELECT COUNT(*) FROM featured_projects WHERE expires_at > NOW()) AS active_featured_projects
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn list_accounts(&self, search: Option<&str>, page: PageParams) -> Result<Vec<AccountSummary>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(ACCOUNT_SELECT);
        push_search(&mut builder, search);
        builder
            .push(" ORDER BY u.created_at DESC, u.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let accounts = builder
            .build_query_as::<AccountSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    async fn count_accounts(&self, search: Option<&str>) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM users u JOIN profiles p ON p.id = u.id",
        );
        push_search(&mut builder, search);

        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn get_account(&self, id: &Uuid) -> Result<Option<AccountSummary>, AppError> {
        let sql = format!("{ACCOUNT_SELECT} WHERE u.id = $1 AND u.deleted_at IS NULL");
        let account = sqlx::query_as::<_, AccountSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }
}
