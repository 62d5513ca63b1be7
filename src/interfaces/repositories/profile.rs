use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::borrow::Cow;
use uuid::Uuid;

use crate::{
    entities::{
        pagination::PageParams,
        profile::{Profile, ProfileChanges, ProfileFilter},
    },
    errors::AppError,
    repositories::sqlx_repo::{escape_like, push_patch, SqlxProfileRepo},
};

const PROFILE_SELECT: &str = r#"
    SELECT p.id, p.username, p.name, p.bio, p.role, p.avatar_url, p.location,
           p.social_links, p.skills, p.badges, p.created_at, p.updated_at
    FROM profiles p
    JOIN users u ON u.id = p.id AND u.deleted_at IS NULL
"#;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile_by_id(&self, id: &Uuid) -> Result<Option<Profile>, AppError>;
    async fn get_profile_by_username(&self, username: &str) -> Result<Option<Profile>, AppError>;
    async fn list_profiles(&self, filter: &ProfileFilter, page: PageParams) -> Result<Vec<Profile>, AppError>;
    async fn count_profiles(&self, filter: &ProfileFilter) -> Result<i64, AppError>;
    async fn update_profile(&self, id: &Uuid, changes: &ProfileChanges) -> Result<Profile, AppError>;
    async fn set_badges(&self, id: &Uuid, badges: &[String]) -> Result<(), AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a ProfileFilter) {
    builder.push(" WHERE TRUE");
    if let Some(role) = filter.role {
        builder.push(" AND p.role = ").push_bind(role);
    }
    if let Some(skill) = &filter.skill {
        builder.push(" AND ").push_bind(skill).push(" = ANY(p.skills)");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (p.username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn get_profile_by_id(&self, id: &Uuid) -> Result<Option<Profile>, AppError> {
        let sql = format!("{PROFILE_SELECT} WHERE p.id = $1");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn get_profile_by_username(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let sql = format!("{PROFILE_SELECT} WHERE p.username = LOWER($1)");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn list_profiles(&self, filter: &ProfileFilter, page: PageParams) -> Result<Vec<Profile>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(PROFILE_SELECT);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY p.created_at DESC, p.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let profiles = builder
            .build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await?;

        Ok(profiles)
    }

    async fn count_profiles(&self, filter: &ProfileFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM profiles p JOIN users u ON u.id = p.id AND u.deleted_at IS NULL",
        );
        push_filters(&mut builder, filter);

        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn update_profile(&self, id: &Uuid, changes: &ProfileChanges) -> Result<Profile, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE profiles SET ");
        {
            let mut set = builder.separated(", ");
            set.push("updated_at = NOW()");

            if let Some(name) = &changes.name {
                set.push("name = ").push_bind_unseparated(name);
            }
            if let Some(username) = &changes.username {
                set.push("username = ").push_bind_unseparated(username);
            }
            push_patch(&mut set, "bio", &changes.bio);
            if let Some(role) = changes.role {
                set.push("role = ").push_bind_unseparated(role);
            }
            push_patch(&mut set, "avatar_url", &changes.avatar_url);
            push_patch(&mut set, "location", &changes.location);
            if let Some(links) = &changes.social_links {
                set.push("social_links = ").push_bind_unseparated(sqlx::types::Json(links.clone()));
            }
            if let Some(skills) = &changes.skills {
                set.push("skills = ").push_bind_unseparated(skills);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, username, name, bio, role, avatar_url, location, social_links, skills, badges, created_at, updated_at");

        builder
            .build_query_as::<Profile>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                    AppError::Conflict("Username is already taken".to_string())
                }
                _ => AppError::from(e),
            })?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    async fn set_badges(&self, id: &Uuid, badges: &[String]) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE profiles SET badges = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(badges)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::profile::ProfileRole;

    #[test]
    fn filters_render_placeholders_in_order() {
        let filter = ProfileFilter {
            role: Some(ProfileRole::Developer),
            skill: Some("rust".into()),
            search: Some("abe".into()),
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM profiles p");
        push_filters(&mut builder, &filter);
        let sql = builder.sql();

        assert!(sql.contains("p.role = $1"));
        assert!(sql.contains("$2 = ANY(p.skills)"));
        assert!(sql.contains("p.username ILIKE $3 OR p.name ILIKE $4"));
    }
}
