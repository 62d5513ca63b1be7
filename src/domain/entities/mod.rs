pub mod admin;
pub mod comment;
pub mod featured;
pub mod oauth;
pub mod option_fields;
pub mod pagination;
pub mod profile;
pub mod project;
pub mod token;
pub mod upvote;
pub mod user;
