use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::domain::types::CodeKind;
use crate::error::AccountServiceError;
use crate::handlers::client_meta;
use crate::state::AppState;
use crate::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub user_id: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: &'static str,
}

// ── POST /functions/verify-2fa-code ──────────────────────────────────────────

pub async fn verify_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Result<Json<VerifyCodeResponse>, AccountServiceError> {
    // An unreadable body carries no usable fields.
    let Json(body) = body.map_err(|_| AccountServiceError::MissingFields)?;

    let usecase = VerifyCodeUseCase {
        credentials: state.two_factor_repo(),
        attempts: state.attempt_repo(),
    };
    let output = usecase
        .execute(VerifyCodeInput {
            user_id: body.user_id,
            code: body.code,
            kind: body.kind,
            client: client_meta(&headers),
        })
        .await?;

    let message = match output.kind {
        CodeKind::Totp => "2FA code verified",
        CodeKind::Backup => "backup code verified",
    };
    Ok(Json(VerifyCodeResponse {
        success: true,
        message,
    }))
}
