pub mod captcha;
pub mod deletion;
pub mod health;
pub mod service_role;
pub mod sweep;
pub mod verify;

use axum::http::{HeaderMap, StatusCode, header::USER_AGENT};

use crate::domain::types::ClientMeta;

/// `OPTIONS` handler for browser-facing function routes. CORS headers are
/// added by the router's `CorsLayer`.
pub async fn preflight() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Requester metadata for audit rows. Behind the gateway the client address
/// is the first `x-forwarded-for` entry.
pub fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let ip_address = header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(str::to_owned);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    ClientMeta {
        ip_address,
        user_agent,
    }
}
