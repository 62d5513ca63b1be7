use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        featured::{FeatureProjectRequest, FeaturedQuery},
        project::{NewProjectRequest, ProjectListQuery, UpdateProjectRequest},
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, AuthClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ProjectListQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects(&query).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(viewer, state))]
pub async fn get_project(
    viewer: OptionalClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler
        .get_project(&project_id, viewer.viewer_id())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(claims, state, data), fields(user_id = %claims.0.sub))]
pub async fn create_project(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler
        .create_project(&claims.0, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(claims, state, data), fields(user_id = %claims.0.sub))]
pub async fn update_project(
    claims: AuthClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler
        .update_project(&claims.0, &project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(claims, state), fields(user_id = %claims.0.sub))]
pub async fn delete_project(
    claims: AuthClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&claims.0, &project_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state))]
pub async fn featured_projects(
    state: web::Data<AppState>,
    query: web::Query<FeaturedQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.featured_projects(&query).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// The body is optional; without it the configured default window applies.
#[instrument(skip(claims, state, data), fields(admin = %claims.0.sub))]
pub async fn feature_project(
    claims: AdminClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
    data: Option<web::Json<FeatureProjectRequest>>,
) -> Result<impl Responder, AppError> {
    let request = data.map(web::Json::into_inner).unwrap_or_default();
    let featured = state.project_handler
        .feature_project(&claims.0, &project_id, request)
        .await?;
    Ok(HttpResponse::Ok().json(featured))
}

#[instrument(skip(_claims, state))]
pub async fn unfeature_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.project_handler.unfeature_project(&project_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state))]
pub async fn featured_entries(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let entries = state.project_handler.featured_entries().await?;
    Ok(HttpResponse::Ok().json(entries))
}
