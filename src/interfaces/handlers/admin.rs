use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::admin::{AdminUpdateUserRequest, UserListQuery},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state))]
pub async fn dashboard(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let stats = state.admin_handler.dashboard().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[instrument(skip(_claims, state))]
pub async fn list_users(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<UserListQuery>,
) -> Result<impl Responder, AppError> {
    let users = state.admin_handler.list_users(&query).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[instrument(skip(claims, state, data), fields(admin = %claims.0.sub))]
pub async fn update_user(
    claims: AdminClaims,
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    data: web::Json<AdminUpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let account = state.admin_handler
        .update_user(&claims.0, &user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

#[instrument(skip(claims, state), fields(admin = %claims.0.sub))]
pub async fn delete_user(
    claims: AdminClaims,
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.admin_handler.delete_user(&claims.0, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
