use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::validation::{
        new_validation_error, normalize_tags, validate_link, validate_not_blank,
        validate_optional_http_url, validate_tags, validate_username,
    },
    entities::option_fields::{OptionField, PatchString},
    utils::markdown::strip_html,
};

const MAX_NAME_LENGTH: u64 = 100;
const MAX_BIO_LENGTH: u64 = 1000;
const MAX_LOCATION_LENGTH: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    #[default]
    Developer,
    #[serde(alias = "company")]
    Recruiter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_link"))]
    pub github: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_link"))]
    pub linkedin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_link"))]
    pub twitter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_link"))]
    pub telegram: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_link"))]
    pub website: Option<String>,
}

impl SocialLinks {
    /// Drops links that are present but blank.
    pub fn compact(self) -> Self {
        fn keep(link: Option<String>) -> Option<String> {
            link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
        }
        SocialLinks {
            github: keep(self.github),
            linkedin: keep(self.linkedin),
            twitter: keep(self.twitter),
            telegram: keep(self.telegram),
            website: keep(self.website),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub bio: Option<String>,
    pub role: ProfileRole,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub social_links: Json<SocialLinks>,
    pub skills: Vec<String>,
    pub badges: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProfileInsert {
    pub username: String,
    pub name: String,
    pub role: ProfileRole,
    pub avatar_url: Option<String>,
    pub social_links: SocialLinks,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH, message = "Name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,

    #[validate(length(max = MAX_BIO_LENGTH, message = "Bio must be at most 1000 characters"))]
    pub bio: PatchString,

    pub role: Option<ProfileRole>,

    #[validate(custom(function = "validate_optional_http_url"))]
    pub avatar_url: PatchString,

    #[validate(length(max = MAX_LOCATION_LENGTH, message = "Location must be at most 100 characters"))]
    pub location: PatchString,

    #[validate(nested)]
    pub social_links: Option<SocialLinks>,

    #[validate(custom(function = "validate_tags"))]
    pub skills: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.bio.is_unchanged()
            && self.role.is_none()
            && self.avatar_url.is_unchanged()
            && self.location.is_unchanged()
            && self.social_links.is_none()
            && self.skills.is_none()
    }
}

/// Validated, normalised profile changes ready for the repository.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: OptionField<String>,
    pub role: Option<ProfileRole>,
    pub avatar_url: OptionField<String>,
    pub location: OptionField<String>,
    pub social_links: Option<SocialLinks>,
    pub skills: Option<Vec<String>>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileChanges {
            name: request.name.map(|n| n.trim().to_string()),
            username: request.username,
            bio: request.bio.map_value(|b| strip_html(&b)).blank_as_null(),
            role: request.role,
            avatar_url: request.avatar_url.blank_as_null(),
            location: request.location.blank_as_null(),
            social_links: request.social_links.map(SocialLinks::compact),
            skills: request.skills.map(normalize_tags),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileListQuery {
    pub role: Option<ProfileRole>,
    pub skill: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFilter {
    pub role: Option<ProfileRole>,
    pub skill: Option<String>,
    pub search: Option<String>,
}

impl From<&ProfileListQuery> for ProfileFilter {
    fn from(query: &ProfileListQuery) -> Self {
        ProfileFilter {
            role: query.role,
            skill: query.skill.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase),
            search: query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
        }
    }
}

pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 || len as u64 > MAX_NAME_LENGTH {
        return Err(new_validation_error("name_length", "Name must be 1-100 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_is_accepted_as_recruiter_alias() {
        let role: ProfileRole = serde_json::from_str(r#""company""#).unwrap();
        assert_eq!(role, ProfileRole::Recruiter);
        assert_eq!(serde_json::to_string(&ProfileRole::Recruiter).unwrap(), r#""recruiter""#);
    }

    #[test]
    fn update_request_validates_nested_links() {
        let request: UpdateProfileRequest = serde_json::from_str(
            r#"{"social_links": {"github": "ftp://github.com/x"}}"#
        ).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateProfileRequest = serde_json::from_str(
            r#"{"social_links": {"github": "https://github.com/x"}, "bio": null}"#
        ).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.bio, OptionField::SetToNull);
    }

    #[test]
    fn changes_strip_bio_markup_and_normalise_skills() {
        let request: UpdateProfileRequest = serde_json::from_str(
            r#"{"bio": "<b>Backend</b> dev", "skills": [" Rust", "rust", "Go "], "location": "  "}"#
        ).unwrap();
        let changes = ProfileChanges::from(request);

        assert_eq!(changes.bio, OptionField::SetToValue("Backend dev".to_string()));
        assert_eq!(changes.skills, Some(vec!["rust".to_string(), "go".to_string()]));
        assert_eq!(changes.location, OptionField::SetToNull);
        assert!(changes.avatar_url.is_unchanged());
    }

    #[test]
    fn empty_update_is_detected() {
        let request: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn filter_normalises_blank_values() {
        let query = ProfileListQuery {
            skill: Some("  Rust ".into()),
            search: Some("   ".into()),
            ..Default::default()
        };
        let filter = ProfileFilter::from(&query);
        assert_eq!(filter.skill.as_deref(), Some("rust"));
        assert!(filter.search.is_none());
    }

    #[test]
    fn blank_social_links_clear_instead_of_failing() {
        let request: UpdateProfileRequest = serde_json::from_str(
            r#"{"social_links": {"github": "", "website": "https://abebe.dev"}}"#
        ).unwrap();
        assert!(request.validate().is_ok());

        let links = ProfileChanges::from(request).social_links.unwrap();
        assert!(links.github.is_none());
        assert_eq!(links.website.as_deref(), Some("https://abebe.dev"));
    }

    #[test]
    fn overlong_bio_is_rejected() {
        let request = UpdateProfileRequest {
            bio: OptionField::SetToValue("b".repeat(1001)),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("bio"));
    }

    #[test]
    fn social_links_compact_removes_blank_entries() {
        let links = SocialLinks {
            github: Some("  ".into()),
            website: Some(" https://abebe.dev ".into()),
            ..Default::default()
        };
        let compacted = links.compact();
        assert!(compacted.github.is_none());
        assert_eq!(compacted.website.as_deref(), Some("https://abebe.dev"));
    }
}
