use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        oauth::OAuthCallbackQuery,
        token::{AuthResponse, LogoutRequest, RefreshTokenRequest},
        user::{LoginUser, NewUser},
    },
    errors::{AppError, AuthError},
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.register(user.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[instrument(skip(state, request))]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[instrument(skip(claims, state, body), fields(user_id = %claims.0.sub))]
pub async fn logout(
    claims: AuthClaims,
    state: web::Data<AppState>,
    body: web::Json<LogoutRequest>
) -> Result<impl Responder, AuthError> {
    state.auth_handler.logout(&claims.0, &body.refresh_token).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})))
}

#[instrument(skip(state))]
pub async fn oauth_start(
    state: web::Data<AppState>,
    provider: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let location = state.oauth_handler.start(&provider)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

#[instrument(skip(state, query))]
pub async fn oauth_callback(
    state: web::Data<AppState>,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<impl Responder, AppError> {
    let tokens = state.oauth_handler.callback(&provider, query.into_inner()).await?;

    match &state.frontend_url {
        Some(frontend_url) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, frontend_redirect(frontend_url, &tokens)))
            .finish()),
        None => Ok(HttpResponse::Ok().json(tokens)),
    }
}

/// Tokens go in the URL fragment.
fn frontend_redirect(frontend_url: &str, tokens: &AuthResponse) -> String {
    format!(
        "{}/auth/callback#access_token={}&refresh_token={}&token_type={}",
        frontend_url,
        urlencoding::encode(&tokens.access_token),
        urlencoding::encode(&tokens.refresh_token),
        tokens.token_type,
    )
}
