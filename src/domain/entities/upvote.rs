use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpvoteStatus {
    pub project_id: Uuid,
    pub upvoted: bool,
    pub upvotes_count: i32,
}
