pub mod admin;
pub mod auth;
pub mod comments;
pub mod home;
pub mod profiles;
pub mod projects;
pub mod system;
pub mod upvotes;
pub mod users;
