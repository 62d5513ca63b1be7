use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{errors::AppError, use_cases::extractors::AuthClaims, AppState};

#[instrument(skip(claims, state), fields(user_id = %claims.0.sub))]
pub async fn me(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let me = state.profile_handler.me(&claims.0).await?;
    Ok(HttpResponse::Ok().json(me))
}

#[instrument(skip(claims, state), fields(actor = %claims.0.sub))]
pub async fn delete_user(
    claims: AuthClaims,
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.profile_handler.delete_account(&claims.0, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
