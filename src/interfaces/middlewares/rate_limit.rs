use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    errors::AppError,
    limiter::rate_limiter::{RateDecision, RateLimiterStore},
    utils::get_client_ip::get_service_client_ip,
};

const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Per-IP token bucket in front of a scope; exhausted clients get 429 with `Retry-After`.
pub struct RateLimit {
    store: RateLimiterStore,
    trust_x_forwarded_for: bool,
}

impl RateLimit {
    pub fn new(store: RateLimiterStore, trust_x_forwarded_for: bool) -> Self {
        RateLimit { store, trust_x_forwarded_for }
    }
}

impl<S> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            trust_x_forwarded_for: self.trust_x_forwarded_for,
        })
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimiterStore,
    trust_x_forwarded_for: bool,
}

impl<S> Service<ServiceRequest> for RateLimitService<S>
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
        let client_ip = get_service_client_ip(&req, self.trust_x_forwarded_for);
        let decision = self.store.check(&client_ip);

        Box::pin(async move {
            match decision {
                RateDecision::Limited { retry_after } => {
                    tracing::warn!(client_ip = %client_ip, path = %req.path(), retry_after, "Rate limit exceeded");
                    let response = AppError::TooManyRequests(retry_after).error_response();
                    Ok(req.into_response(response))
                }
                RateDecision::Allowed { remaining } => {
                    let mut res = service.call(req).await?;
                    res.headers_mut().insert(
                        HeaderName::from_static(REMAINING_HEADER),
                        HeaderValue::from(remaining),
                    );
                    Ok(res)
                }
            }
        })
    }
}
