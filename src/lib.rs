use std::time::Duration;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, cache, db, limiter, utils};

use auth::{jwt::JwtService, oauth::HttpOAuthClient};
use cache::token_store::RedisTokenStore;
use limiter::rate_limiter::RateLimiterStore;
use repositories::sqlx_repo::{
    SqlxAdminRepo, SqlxCommentRepo, SqlxFeaturedRepo, SqlxProfileRepo, SqlxProjectRepo,
    SqlxUpvoteRepo, SqlxUserRepo,
};
use settings::AppConfig;
use shared_repos::SharedRepositories;
use use_cases::{
    admin::AdminHandler, auth::AuthHandler, comment::CommentHandler, oauth::OAuthHandler,
    profile::ProfileHandler, project::ProjectHandler, upvote::UpvoteHandler,
};

const RATE_LIMIT_BUCKET_TTL: Duration = Duration::from_secs(15 * 60);

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService, RedisTokenStore>;
pub type AppOAuthHandler = OAuthHandler<SqlxUserRepo, JwtService, HttpOAuthClient>;
pub type AppProfileHandler = ProfileHandler<SqlxProfileRepo, SqlxUserRepo, RedisTokenStore>;
pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo, SqlxFeaturedRepo, SqlxUpvoteRepo>;
pub type AppUpvoteHandler = UpvoteHandler<SqlxUpvoteRepo, SqlxProjectRepo>;
pub type AppCommentHandler = CommentHandler<SqlxCommentRepo, SqlxProjectRepo>;
pub type AppAdminHandler = AdminHandler<SqlxAdminRepo, SqlxUserRepo, SqlxProfileRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub oauth_handler: AppOAuthHandler,
    pub profile_handler: AppProfileHandler,
    pub project_handler: AppProjectHandler,
    pub upvote_handler: AppUpvoteHandler,
    pub comment_handler: AppCommentHandler,
    pub admin_handler: AppAdminHandler,
    pub repos: SharedRepositories,
    pub auth_rate_limiter: RateLimiterStore,
    pub trust_x_forwarded_for: bool,
    pub frontend_url: Option<String>,
    pub app_name: String,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        let revocations = RedisTokenStore::new(config.redis_url.as_deref());
        if !revocations.is_configured() {
            tracing::warn!("Redis is not configured; logout cannot revoke outstanding tokens");
        }
        Self::with_token_store(config, pool, revocations)
    }

    pub fn with_token_store(config: &AppConfig, pool: sqlx::PgPool, revocations: RedisTokenStore) -> Self {
        let repos = SharedRepositories::new(pool);
        let jwt_service = JwtService::new(config);

        AppState {
            auth_handler: AuthHandler::new(repos.user_repo.clone(), jwt_service.clone(), revocations.clone()),
            oauth_handler: OAuthHandler::new(
                repos.user_repo.clone(),
                jwt_service,
                HttpOAuthClient::new(config),
            ),
            profile_handler: ProfileHandler::new(repos.profile_repo.clone(), repos.user_repo.clone(), revocations),
            project_handler: ProjectHandler::new(
                repos.project_repo.clone(),
                repos.featured_repo.clone(),
                repos.upvote_repo.clone(),
                config.featured_default_days,
            ),
            upvote_handler: UpvoteHandler::new(repos.upvote_repo.clone(), repos.project_repo.clone()),
            comment_handler: CommentHandler::new(repos.comment_repo.clone(), repos.project_repo.clone()),
            admin_handler: AdminHandler::new(
                repos.admin_repo.clone(),
                repos.user_repo.clone(),
                repos.profile_repo.clone(),
            ),
            auth_rate_limiter: RateLimiterStore::new(
                config.auth_rate_limit_capacity,
                config.auth_rate_limit_refill_per_sec,
                RATE_LIMIT_BUCKET_TTL,
            ),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
            frontend_url: config
                .frontend_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            app_name: config.name.clone(),
            repos,
        }
    }
}
