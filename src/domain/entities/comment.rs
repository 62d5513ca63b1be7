use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{domain::validation::new_validation_error, utils::markdown::strip_html};

const MAX_COMMENT_LENGTH: u64 = 2000;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author's public handle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub author_username: String,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentInsert {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(custom(function = "validate_comment_length"))]
    pub content: String,
}

fn validate_comment_length(content: &str) -> Result<(), ValidationError> {
    let len = content.trim().chars().count() as u64;
    if len == 0 || len > MAX_COMMENT_LENGTH {
        return Err(new_validation_error("comment_length", "Comment must be 1-2000 characters"));
    }
    Ok(())
}

impl CommentRequest {
    /// Strips markup and surrounding whitespace; `None` when nothing is left.
    pub fn sanitized_content(&self) -> Option<String> {
        let cleaned = strip_html(self.content.trim());
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }
}
