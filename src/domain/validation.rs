use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::entities::option_fields::OptionField;

pub const MAX_TAGS: usize = 30;
pub const MAX_TAG_LENGTH: usize = 40;
pub const MAX_URL_LENGTH: usize = 2048;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_]{3,30}$").expect("username pattern is valid")
});

pub fn new_validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.to_string()));
    error
}

/// Lowercase letters, digits and underscores, 3 to 30 characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(new_validation_error(
            "username_format",
            "Username must be 3-30 lowercase letters, digits or underscores",
        ))
    }
}

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    if url.len() > MAX_URL_LENGTH {
        return Err(new_validation_error("url_too_long", "URL is too long"));
    }
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(_) => Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://")),
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

/// Blank means "clear this link"; anything else must be an http(s) URL.
pub fn validate_link(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Ok(());
    }
    validate_http_url(url.trim())
}

pub fn validate_optional_http_url(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(url) => validate_http_url(url),
        _ => Ok(()),
    }
}

pub fn validate_url_list(urls: &Vec<String>) -> Result<(), ValidationError> {
    urls.iter().try_for_each(|u| validate_http_url(u))
}

pub fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", &format!("At most {} tags are allowed", MAX_TAGS)));
    }
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(new_validation_error("tag_empty", "Tags cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TAG_LENGTH {
            return Err(new_validation_error("tag_too_long", &format!("Tags must be at most {} characters", MAX_TAG_LENGTH)));
        }
    }
    Ok(())
}

/// Trims, lowercases and de-duplicates tags while keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(new_validation_error("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}
