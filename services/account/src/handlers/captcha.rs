use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::error::AccountServiceError;
use crate::handlers::client_meta;
use crate::state::AppState;
use crate::usecase::captcha::VerifyCaptchaUseCase;

#[derive(Deserialize)]
pub struct VerifyCaptchaRequest {
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyCaptchaResponse {
    pub success: bool,
    pub message: &'static str,
}

// ── POST /functions/verify-captcha ───────────────────────────────────────────

pub async fn verify_captcha(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<VerifyCaptchaRequest>, JsonRejection>,
) -> Result<Json<VerifyCaptchaResponse>, AccountServiceError> {
    let Json(body) = body.map_err(|_| AccountServiceError::MissingFields)?;
    let usecase = VerifyCaptchaUseCase {
        verifier: state.captcha.clone(),
    };
    usecase.execute(body.token, &client_meta(&headers)).await?;
    Ok(Json(VerifyCaptchaResponse {
        success: true,
        message: "captcha verified",
    }))
}
