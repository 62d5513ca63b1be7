use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        profile::{ProfileListQuery, UpdateProfileRequest},
        project::ProjectListQuery,
    },
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<ProfileListQuery>,
) -> Result<impl Responder, AppError> {
    let profiles = state.profile_handler.list_profiles(&query).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

#[instrument(skip(state))]
pub async fn get_profile(
    state: web::Data<AppState>,
    profile_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.get_profile(&profile_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(state))]
pub async fn get_profile_by_username(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.get_profile_by_username(&username).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data), fields(user_id = %claims.0.sub))]
pub async fn update_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
    profile_id: web::Path<Uuid>,
    data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler
        .update_profile(&claims.0, &profile_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(state))]
pub async fn profile_projects(
    state: web::Data<AppState>,
    profile_id: web::Path<Uuid>,
    query: web::Query<ProjectListQuery>,
) -> Result<impl Responder, AppError> {
    state.profile_handler.get_profile(&profile_id).await?;
    let projects = state.project_handler
        .developer_projects(&profile_id, &query)
        .await?;
    Ok(HttpResponse::Ok().json(projects))
}
