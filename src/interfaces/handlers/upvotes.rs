use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::AppError,
    use_cases::extractors::{AuthClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(viewer, state))]
pub async fn upvote_status(
    viewer: OptionalClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let status = state.upvote_handler.status(&project_id, viewer.viewer_id()).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[instrument(skip(claims, state), fields(user_id = %claims.0.sub))]
pub async fn upvote_project(
    claims: AuthClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let status = state.upvote_handler.upvote(&claims.0, &project_id).await?;
    Ok(HttpResponse::Created().json(status))
}

#[instrument(skip(claims, state), fields(user_id = %claims.0.sub))]
pub async fn remove_upvote(
    claims: AuthClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let status = state.upvote_handler.remove_upvote(&claims.0, &project_id).await?;
    Ok(HttpResponse::Ok().json(status))
}
