use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::validation::{
        new_validation_error, normalize_tags, validate_http_url, validate_optional_http_url,
        validate_url_list, validate_tags,
    },
    entities::option_fields::{OptionField, PatchString},
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_DESCRIPTION_LENGTH: u64 = 10;
const MAX_DESCRIPTION_LENGTH: u64 = 10_000;
const MAX_TECH_TAGS: u64 = 20;
const MAX_MEDIA_URLS: u64 = 10;

// ───── Database Models ───────────────────────────────────────────────

/// Project row joined with its developer's public handle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub media_urls: Vec<String>,
    pub developer_id: Uuid,
    pub developer_username: String,
    pub developer_name: String,
    pub developer_avatar_url: Option<String>,
    pub upvotes_count: i32,
    pub comments_count: i32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub media_urls: Vec<String>,
    pub developer_id: Uuid,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub description_html: String,
    pub upvoted: bool,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[validate(length(
        min = MIN_DESCRIPTION_LENGTH,
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description must be 10-10000 characters"
    ))]
    pub description: String,

    #[serde(default)]
    #[validate(
        length(max = MAX_TECH_TAGS, message = "At most 20 technologies are allowed"),
        custom(function = "validate_tags")
    )]
    pub tech_stack: Vec<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub live_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    #[validate(
        length(max = MAX_MEDIA_URLS, message = "At most 10 media URLs are allowed"),
        custom(function = "validate_url_list")
    )]
    pub media_urls: Vec<String>,
}

impl NewProjectRequest {
    pub fn into_insert(self, developer_id: Uuid) -> ProjectInsert {
        ProjectInsert {
            title: self.title.trim().to_string(),
            description: self.description,
            tech_stack: normalize_tags(self.tech_stack),
            github_url: self.github_url,
            live_url: self.live_url,
            thumbnail_url: self.thumbnail_url,
            media_urls: self.media_urls,
            developer_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,

    #[validate(length(
        min = MIN_DESCRIPTION_LENGTH,
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description must be 10-10000 characters"
    ))]
    pub description: Option<String>,

    #[validate(
        length(max = MAX_TECH_TAGS, message = "At most 20 technologies are allowed"),
        custom(function = "validate_tags")
    )]
    pub tech_stack: Option<Vec<String>>,

    #[validate(custom(function = "validate_optional_http_url"))]
    pub github_url: PatchString,

    #[validate(custom(function = "validate_optional_http_url"))]
    pub live_url: PatchString,

    #[validate(custom(function = "validate_optional_http_url"))]
    pub thumbnail_url: PatchString,

    #[validate(
        length(max = MAX_MEDIA_URLS, message = "At most 10 media URLs are allowed"),
        custom(function = "validate_url_list")
    )]
    pub media_urls: Option<Vec<String>>,
}

/// Normalised project changes ready for the repository.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub github_url: OptionField<String>,
    pub live_url: OptionField<String>,
    pub thumbnail_url: OptionField<String>,
    pub media_urls: Option<Vec<String>>,
}

impl From<UpdateProjectRequest> for ProjectChanges {
    fn from(request: UpdateProjectRequest) -> Self {
        ProjectChanges {
            title: request.title.map(|t| t.trim().to_string()),
            description: request.description,
            tech_stack: request.tech_stack.map(normalize_tags),
            github_url: request.github_url.blank_as_null(),
            live_url: request.live_url.blank_as_null(),
            thumbnail_url: request.thumbnail_url.blank_as_null(),
            media_urls: request.media_urls,
        }
    }
}

/// Length is checked on the trimmed title, which is what gets stored.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count() as u64;
    if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&len) {
        return Err(new_validation_error("title_length", "Title must be 3-120 characters"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSort {
    #[default]
    Newest,
    Popular,
    Discussed,
}

impl ProjectSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            ProjectSort::Newest => " ORDER BY p.created_at DESC, p.id",
            ProjectSort::Popular => " ORDER BY p.upvotes_count DESC, p.created_at DESC, p.id",
            ProjectSort::Discussed => " ORDER BY p.comments_count DESC, p.created_at DESC, p.id",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectListQuery {
    pub search: Option<String>,
    pub tech: Option<String>,
    pub developer_id: Option<Uuid>,
    pub sort: Option<ProjectSort>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub tech: Option<String>,
    pub developer_id: Option<Uuid>,
    pub sort: ProjectSort,
}

impl From<&ProjectListQuery> for ProjectFilter {
    fn from(query: &ProjectListQuery) -> Self {
        ProjectFilter {
            search: query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            tech: query.tech.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase),
            developer_id: query.developer_id,
            sort: query.sort.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project() -> NewProjectRequest {
        NewProjectRequest {
            title: "  Addis Bus Tracker ".into(),
            description: "Live bus positions for Addis Ababa commuters.".into(),
            tech_stack: vec!["Rust".into(), "rust".into(), "PostGIS".into()],
            github_url: Some("https://github.com/abebe/bus".into()),
            live_url: None,
            thumbnail_url: None,
            media_urls: vec![],
        }
    }

    #[test]
    fn valid_project_passes_validation() {
        assert!(new_project().validate().is_ok());
    }

    #[test]
    fn short_title_and_bad_urls_fail() {
        let project = NewProjectRequest {
            title: "ab".into(),
            media_urls: vec!["file:///etc/passwd".into()],
            ..new_project()
        };
        let errors = project.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("media_urls"));
    }

    #[test]
    fn title_length_counts_trimmed_characters() {
        let padded = NewProjectRequest { title: "  ab  ".into(), ..new_project() };
        assert!(padded.validate().unwrap_err().field_errors().contains_key("title"));

        let blank = NewProjectRequest { title: " ".repeat(10), ..new_project() };
        assert!(blank.validate().is_err());

        let update: UpdateProjectRequest = serde_json::from_str(r#"{"title": "   x   "}"#).unwrap();
        assert!(update.validate().unwrap_err().field_errors().contains_key("title"));

        let long = format!("  {}  ", "t".repeat(120));
        assert!(NewProjectRequest { title: long, ..new_project() }.validate().is_ok());
    }

    #[test]
    fn into_insert_normalises_title_and_tags() {
        let developer_id = Uuid::new_v4();
        let insert = new_project().into_insert(developer_id);
        assert_eq!(insert.title, "Addis Bus Tracker");
        assert_eq!(insert.tech_stack, vec!["rust".to_string(), "postgis".to_string()]);
        assert_eq!(insert.developer_id, developer_id);
    }

    #[test]
    fn update_with_blank_url_clears_it() {
        let request: UpdateProjectRequest = serde_json::from_str(r#"{"live_url": ""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateProjectRequest = serde_json::from_str(r#"{"live_url": null}"#).unwrap();
        assert!(request.validate().is_ok());
        let changes = ProjectChanges::from(request);
        assert_eq!(changes.live_url, OptionField::SetToNull);
        assert!(changes.github_url.is_unchanged());
    }

    #[test]
    fn sort_defaults_to_newest() {
        let query: ProjectListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(ProjectFilter::from(&query).sort, ProjectSort::Newest);

        let query: ProjectListQuery = serde_json::from_str(r#"{"sort": "popular"}"#).unwrap();
        assert_eq!(ProjectFilter::from(&query).sort, ProjectSort::Popular);
    }
}
