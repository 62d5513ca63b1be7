use actix_web::web;

use crate::handlers::profiles;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .service(
                web::resource("")
                    .route(web::get().to(profiles::list_profiles))
            )
            .service(
                web::resource("/username/{username}")
                    .route(web::get().to(profiles::get_profile_by_username))
            )
            .service(
                web::resource("/{profile_id}")
                    .route(web::get().to(profiles::get_profile))
                    .route(web::patch().to(profiles::update_profile))
            )
            .service(
                web::resource("/{profile_id}/projects")
                    .route(web::get().to(profiles::profile_projects))
            )
    );

    // Singular form kept for clients that update with POST.
    cfg.service(
        web::resource("/profile/{profile_id}")
            .route(web::post().to(profiles::update_profile))
    );
}
