use actix_web::{dev::ServiceRequest, HttpRequest};

/// Extract the client's IP address from the request, considering X-Forwarded-For if trusted.
/// `trust_x_forwarded_for`: whether a reverse proxy in front of us sets the header
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> String {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn get_service_client_ip(req: &ServiceRequest, trust_x_forwarded_for: bool) -> String {
    get_client_ip(req.request(), trust_x_forwarded_for)
}
