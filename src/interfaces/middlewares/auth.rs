use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, errors::AuthError, AppState};

pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path().to_string();
            let public = is_public_route(&path, req.method());

            let Some(token) = extract_token(&req) else {
                if public {
                    return service.call(req).await;
                }
                tracing::warn!(path = %path, "Missing or malformed Authorization header");
                return Ok(error_response(req, AuthError::MissingCredentials));
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in middleware");
                return Ok(error_response(req, AuthError::MissingAppState));
            };

            let claims = match authenticate(&state, &token).await {
                Ok(claims) => claims,
                // Bad tokens on public routes fall back to anonymous access.
                Err(e) if public => {
                    tracing::debug!(path = %path, "Ignoring invalid token on public route: {}", e);
                    return service.call(req).await;
                }
                Err(e) => {
                    tracing::warn!(path = %path, "Rejected token: {}", e);
                    return Ok(error_response(req, e));
                }
            };

            if let Err(e) = enforce_admin_access(&path, &claims) {
                return Ok(error_response(req, e));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

/// Routes reachable without a token. A valid token still attaches claims.
pub fn is_public_route(path: &str, method: &Method) -> bool {
    if method == Method::OPTIONS {
        return true;
    }

    if method == Method::GET {
        return matches!(path, "/" | "/health")
            || path == "/api/projects"
            || path.starts_with("/api/projects/")
            || path == "/api/profiles"
            || path.starts_with("/api/profiles/")
            || path.starts_with("/api/auth/oauth/");
    }

    method == Method::POST
        && matches!(path, "/api/auth/register" | "/api/auth/login" | "/api/auth/refresh")
}

pub fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

async fn authenticate(state: &AppState, token: &str) -> Result<Claims, AuthError> {
    let claims = state.auth_handler.token_service.decode_jwt(token)?.claims;

    if state.auth_handler.is_revoked(&claims.jti).await? {
        return Err(AuthError::TokenRevoked);
    }
    Ok(claims)
}

fn enforce_admin_access(path: &str, claims: &Claims) -> Result<(), AuthError> {
    if (path == "/api/admin" || path.starts_with("/api/admin/")) && !claims.admin {
        tracing::warn!(user_id = %claims.sub, path = %path, "Admin access required");
        return Err(AuthError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

fn error_response(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}
