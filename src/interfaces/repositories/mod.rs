pub mod admin;
pub mod comment;
pub mod featured;
pub mod oauth;
pub mod profile;
pub mod project;
pub mod sqlx_repo;
pub mod token;
pub mod upvote;
pub mod user;
