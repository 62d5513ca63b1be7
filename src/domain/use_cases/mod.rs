pub mod admin;
pub mod auth;
pub mod comment;
pub mod extractors;
pub mod oauth;
pub mod profile;
pub mod project;
pub mod upvote;
