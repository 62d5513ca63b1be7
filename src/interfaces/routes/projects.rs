use actix_web::web;

use crate::handlers::{comments, projects, upvotes};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::get().to(projects::list_projects))
                    .route(web::post().to(projects::create_project))
            )
            .service(
                web::resource("/featured")
                    .route(web::get().to(projects::featured_projects))
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project))
                    .route(web::patch().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
            )
            .service(
                web::resource("/{project_id}/comments")
                    .route(web::get().to(comments::list_comments))
                    .route(web::post().to(comments::create_comment))
            )
            .service(
                web::resource("/{project_id}/upvote")
                    .route(web::get().to(upvotes::upvote_status))
                    .route(web::post().to(upvotes::upvote_project))
                    .route(web::delete().to(upvotes::remove_upvote))
            )
    );
}
