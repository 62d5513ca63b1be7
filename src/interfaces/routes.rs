use actix_web::web;

use crate::{
    handlers::{home::home, system::health},
    middlewares::rate_limit::RateLimit,
    AppState,
};

mod admin;
mod auth;
mod comments;
mod json_error;
mod profiles;
mod projects;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &web::Data<AppState>) {
    cfg.service(home);
    cfg.service(health);

    let auth_limiter = RateLimit::new(state.auth_rate_limiter.clone(), state.trust_x_forwarded_for);

    cfg.service(
        web::scope("/api")
            .configure(|cfg| auth::config_routes(cfg, auth_limiter))
            .configure(users::config_routes)
            .configure(profiles::config_routes)
            .configure(projects::config_routes)
            .configure(comments::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
