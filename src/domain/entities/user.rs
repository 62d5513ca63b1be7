use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use uuid::Uuid;

use crate::{
    domain::{password::validate_password_strength, validation::validate_username},
    entities::profile::{validate_display_name, Profile, ProfileInsert, ProfileRole, SocialLinks},
};

/// Account row joined with the public handle and role from its profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub username: String,
    pub role: ProfileRole,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug)]
pub struct UserInsert {
    pub email: String,
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 8, message = "Must be at least 8 characters"),
        custom(
            function = "validate_password_strength",
            message = "Must include uppercase, number, and symbol"
        )
    )]
    pub password: String,

    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(custom(function = "validate_display_name"))]
    pub name: String,

    #[serde(default)]
    pub role: ProfileRole,
}

impl NewUser {
    pub fn prepare_for_insert(&self, password_hash: String) -> (UserInsert, ProfileInsert) {
        let now = Utc::now();
        let user = UserInsert {
            email: self.email.trim().to_lowercase(),
            password_hash: Some(password_hash),
            is_admin: false,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        let profile = ProfileInsert {
            username: self.username.clone(),
            name: self.name.trim().to_string(),
            role: self.role,
            avatar_url: None,
            social_links: SocialLinks::default(),
        };
        (user, profile)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewUserResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: ProfileRole,
    pub is_admin: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            is_admin: user.is_admin,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: PublicUser,
    pub profile: Profile,
}
