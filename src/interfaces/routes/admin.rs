use actix_web::web;

use crate::handlers::{admin, projects, system::admin_health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin_health_check)
            .service(
                web::resource("/dashboard")
                    .route(web::get().to(admin::dashboard))
            )
            .service(
                web::resource("/users")
                    .route(web::get().to(admin::list_users))
            )
            .service(
                web::resource("/users/{user_id}")
                    .route(web::patch().to(admin::update_user))
                    .route(web::delete().to(admin::delete_user))
            )
            .service(
                web::resource("/projects/featured")
                    .route(web::get().to(projects::featured_entries))
            )
            .service(
                web::resource("/projects/{project_id}/feature")
                    .route(web::post().to(projects::feature_project))
                    .route(web::delete().to(projects::unfeature_project))
            )
    );
}
