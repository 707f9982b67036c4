use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use meridian_core::identity::IdentityHeaders;
use meridian_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};

use crate::domain::types::{DeletionRequest, DeletionStatus};
use crate::error::AccountServiceError;
use crate::state::AppState;
use crate::usecase::deletion_request::{
    CancelDeletionUseCase, GetDeletionUseCase, RequestDeletionUseCase,
};

#[derive(Serialize)]
pub struct DeletionResponse {
    pub id: Uuid,
    pub status: DeletionStatus,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub scheduled_for: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub processing_started_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<DeletionRequest> for DeletionResponse {
    fn from(request: DeletionRequest) -> Self {
        Self {
            id: request.id,
            status: request.status,
            scheduled_for: request.scheduled_for,
            processing_started_at: request.processing_started_at,
            created_at: request.created_at,
        }
    }
}

// ── POST /account/deletion ────────────────────────────────────────────────────

pub async fn request_deletion(
    State(state): State<AppState>,
    identity: IdentityHeaders,
) -> Result<(StatusCode, Json<DeletionResponse>), AccountServiceError> {
    let usecase = RequestDeletionUseCase {
        deletions: state.deletion_repo(),
        grace_period: state.grace_period,
    };
    let request = usecase.execute(identity.user_id).await?;
    tracing::info!(user_id = %identity.user_id, scheduled_for = %request.scheduled_for, "account deletion scheduled");
    Ok((StatusCode::CREATED, Json(request.into())))
}

// ── GET /account/deletion ─────────────────────────────────────────────────────

pub async fn get_deletion(
    State(state): State<AppState>,
    identity: IdentityHeaders,
) -> Result<Json<DeletionResponse>, AccountServiceError> {
    let usecase = GetDeletionUseCase {
        deletions: state.deletion_repo(),
    };
    let request = usecase.execute(identity.user_id).await?;
    Ok(Json(request.into()))
}

// ── DELETE /account/deletion ──────────────────────────────────────────────────

pub async fn cancel_deletion(
    State(state): State<AppState>,
    identity: IdentityHeaders,
) -> Result<StatusCode, AccountServiceError> {
    let usecase = CancelDeletionUseCase {
        deletions: state.deletion_repo(),
    };
    usecase.execute(identity.user_id).await?;
    tracing::info!(user_id = %identity.user_id, "account deletion cancelled");
    Ok(StatusCode::NO_CONTENT)
}
