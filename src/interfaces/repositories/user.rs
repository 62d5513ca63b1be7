use async_trait::async_trait;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    constants::SOFT_DELETE_RETENTION_DAYS,
    entities::{
        profile::ProfileInsert,
        user::{User, UserInsert},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxUserRepo,
};

const USER_SELECT: &str = r#"
    SELECT u.id, u.email, u.password_hash, u.is_admin, u.is_verified,
           u.created_at, u.updated_at, u.deleted_at, u.deleted_by,
           p.username, p.role
    FROM users u
    JOIN profiles p ON p.id = u.id
"#;

/// External login linked to an account.
#[derive(Debug, Clone, Copy)]
pub struct IdentityRef<'a> {
    pub provider: &'a str,
    pub provider_user_id: &'a str,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn user_exists(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn count_users(&self) -> Result<u64, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    /// Inserts the account and its profile atomically, optionally linking an OAuth identity.
    async fn create_user_with_profile(
        &self,
        user: &UserInsert,
        profile: &ProfileInsert,
        identity: Option<IdentityRef<'_>>,
    ) -> Result<Uuid, AppError>;
    async fn find_user_by_identity(&self, identity: IdentityRef<'_>) -> Result<Option<User>, AppError>;
    async fn link_identity(&self, user_id: &Uuid, identity: IdentityRef<'_>) -> Result<(), AppError>;
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
    async fn update_flags(&self, id: &Uuid, is_admin: Option<bool>, is_verified: Option<bool>) -> Result<(), AppError>;
    async fn delete_user(&self, id: &Uuid, deleted_by: &Uuid) -> Result<(), AppError>;
    async fn purge_soft_deleted_users(&self) -> Result<u64, AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            match db_err.constraint() {
                Some("profiles_username_key") => AppError::Conflict("Username is already taken".to_string()),
                Some("oauth_identities_pkey") => AppError::Conflict("Identity is already linked".to_string()),
                _ => AppError::Conflict("User with this email already exists".to_string()),
            }
        }
        _ => AppError::from(e),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn user_exists(&self, id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("{USER_SELECT} WHERE LOWER(u.email) = LOWER($1) AND u.deleted_at IS NULL");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("{USER_SELECT} WHERE u.id = $1 AND u.deleted_at IS NULL");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create_user_with_profile(
        &self,
        user: &UserInsert,
        profile: &ProfileInsert,
        identity: Option<IdentityRef<'_>>,
    ) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, is_admin, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, username, name, role, avatar_url, social_links, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(&profile.username)
        .bind(&profile.name)
        .bind(profile.role)
        .bind(&profile.avatar_url)
        .bind(sqlx::types::Json(&profile.social_links))
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        if let Some(identity) = identity {
            sqlx::query("INSERT INTO oauth_identities (provider, provider_user_id, user_id) VALUES ($1, $2, $3)")
                .bind(identity.provider)
                .bind(identity.provider_user_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_unique_violation)?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn find_user_by_identity(&self, identity: IdentityRef<'_>) -> Result<Option<User>, AppError> {
        let sql = format!(
            "{USER_SELECT} JOIN oauth_identities oi ON oi.user_id = u.id \
             WHERE oi.provider = $1 AND oi.provider_user_id = $2 AND u.deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(identity.provider)
            .bind(identity.provider_user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn link_identity(&self, user_id: &Uuid, identity: IdentityRef<'_>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO oauth_identities (provider, provider_user_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (provider, provider_user_id) DO NOTHING
            "#,
        )
        .bind(identity.provider)
        .bind(identity.provider_user_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn update_flags(&self, id: &Uuid, is_admin: Option<bool>, is_verified: Option<bool>) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_admin = COALESCE($2, is_admin),
                is_verified = COALESCE($3, is_verified),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(is_admin)
        .bind(is_verified)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &Uuid, deleted_by: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                deleted_at = NOW(),
                deleted_by = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(deleted_by)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return if self.user_exists(id).await? {
                Err(AppError::Conflict("User is already deleted".to_string()))
            } else {
                Err(AppError::NotFound("User not found".to_string()))
            };
        }

        Ok(())
    }

    async fn purge_soft_deleted_users(&self) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM users WHERE deleted_at < NOW() - make_interval(days => $1) FOR UPDATE",
        )
        .bind(SOFT_DELETE_RETENTION_DAYS as i32)
        .fetch_all(&mut *tx)
        .await?;

        if ids.is_empty() {
            tx.rollback().await?;
            return Ok(0);
        }

        // Cascades drop these users' upvotes and comments; counters follow here.
        sqlx::query(
            r#"
            UPDATE projects p
            SET upvotes_count = GREATEST(p.upvotes_count - x.n, 0)
            FROM (
                SELECT project_id, COUNT(*)::int AS n
                FROM upvotes
                WHERE user_id = ANY($1)
                GROUP BY project_id
            ) x
            WHERE p.id = x.project_id
            "#,
        )
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE projects p
            SET comments_count = GREATEST(p.comments_count - x.n, 0)
            FROM (
                SELECT project_id, COUNT(*)::int AS n
                FROM comments
                WHERE user_id = ANY($1)
                GROUP BY project_id
            ) x
            WHERE p.id = x.project_id
            "#,
        )
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
