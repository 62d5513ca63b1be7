use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

pub const DEFAULT_FEATURED_LIMIT: u32 = 6;
pub const MAX_FEATURED_LIMIT: u32 = 50;
pub const MAX_FEATURE_DURATION_DAYS: i64 = 90;

/// Soft-deleted accounts older than this are removed for good.
pub const SOFT_DELETE_RETENTION_DAYS: i64 = 7;
