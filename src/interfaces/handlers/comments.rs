use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::comment::{CommentListQuery, CommentRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_comments(
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
    query: web::Query<CommentListQuery>,
) -> Result<impl Responder, AppError> {
    let comments = state.comment_handler.list_comments(&project_id, &query).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[instrument(skip(claims, state, data), fields(user_id = %claims.0.sub))]
pub async fn create_comment(
    claims: AuthClaims,
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
    data: web::Json<CommentRequest>,
) -> Result<impl Responder, AppError> {
    let comment = state.comment_handler
        .create_comment(&claims.0, &project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

#[instrument(skip(claims, state, data), fields(user_id = %claims.0.sub))]
pub async fn update_comment(
    claims: AuthClaims,
    state: web::Data<AppState>,
    comment_id: web::Path<Uuid>,
    data: web::Json<CommentRequest>,
) -> Result<impl Responder, AppError> {
    let comment = state.comment_handler
        .update_comment(&claims.0, &comment_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

#[instrument(skip(claims, state), fields(user_id = %claims.0.sub))]
pub async fn delete_comment(
    claims: AuthClaims,
    state: web::Data<AppState>,
    comment_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.comment_handler.delete_comment(&claims.0, &comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
