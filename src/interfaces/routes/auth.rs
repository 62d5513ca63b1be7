use actix_web::web;

use crate::{handlers::auth, middlewares::rate_limit::RateLimit};

pub fn config_routes(cfg: &mut web::ServiceConfig, limiter: RateLimit) {
    cfg.service(
        web::scope("/auth")
            .wrap(limiter)
            .service(web::resource("/register").route(web::post().to(auth::register)))
            .service(web::resource("/login").route(web::post().to(auth::login)))
            .service(web::resource("/refresh").route(web::post().to(auth::refresh_token)))
            .service(web::resource("/logout").route(web::post().to(auth::logout)))
            .service(web::resource("/oauth/{provider}").route(web::get().to(auth::oauth_start)))
            .service(
                web::resource("/oauth/{provider}/callback")
                    .route(web::get().to(auth::oauth_callback))
            )
    );
}
