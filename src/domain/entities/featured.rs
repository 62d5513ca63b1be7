use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_FEATURE_DURATION_DAYS;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeaturedProject {
    pub project_id: Uuid,
    pub featured_by: Option<Uuid>,
    pub featured_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Featured row joined with the project title, for the back-office list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeaturedEntry {
    pub project_id: Uuid,
    pub title: String,
    pub featured_by: Option<Uuid>,
    pub featured_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct FeatureProjectRequest {
    #[validate(range(min = 1, max = MAX_FEATURE_DURATION_DAYS, message = "Duration must be 1-90 days"))]
    pub duration_days: Option<i64>,
}

impl FeatureProjectRequest {
    /// Window starting at `now`, falling back to `default_days`.
    pub fn window(&self, now: DateTime<Utc>, default_days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let days = self.duration_days.unwrap_or(default_days);
        (now, now + Duration::days(days))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeaturedQuery {
    pub limit: Option<u32>,
}
