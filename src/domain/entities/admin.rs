use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{domain::validation::validate_tags, entities::profile::ProfileRole};

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct PlatformStats {
    pub users: i64,
    pub developers: i64,
    pub recruiters: i64,
    pub projects: i64,
    pub comments: i64,
    pub upvotes: i64,
    pub active_featured_projects: i64,
}

/// Account listing row for the back-office.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub role: ProfileRole,
    pub is_admin: bool,
    pub is_verified: bool,
    pub badges: Vec<String>,
    pub projects_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl UserListQuery {
    pub fn search_term(&self) -> Option<String> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AdminUpdateUserRequest {
    pub is_admin: Option<bool>,
    pub is_verified: Option<bool>,
    #[validate(custom(function = "validate_tags"))]
    pub badges: Option<Vec<String>>,
}

impl AdminUpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.is_admin.is_none() && self.is_verified.is_none() && self.badges.is_none()
    }
}
