use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use meridian_core::error::not_found;
use meridian_core::health::healthz;
use meridian_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    captcha::verify_captcha,
    deletion::{cancel_deletion, get_deletion, request_deletion},
    health::readyz,
    preflight,
    sweep::process_deletions,
    verify::verify_code,
};
use crate::state::AppState;

/// Browser-callable functions accept any origin.
fn function_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
}

pub fn build_router(state: AppState) -> Router {
    let public_functions = Router::new()
        .route(
            "/functions/verify-2fa-code",
            post(verify_code).options(preflight),
        )
        .route(
            "/functions/verify-captcha",
            post(verify_captcha).options(preflight),
        )
        .layer(function_cors());

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Functions
        .merge(public_functions)
        .route(
            "/functions/process-account-deletions",
            post(process_deletions),
        )
        // Deletion lifecycle
        .route(
            "/account/deletion",
            post(request_deletion)
                .get(get_deletion)
                .delete(cancel_deletion),
        )
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
