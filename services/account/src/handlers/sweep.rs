use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::AccountServiceError;
use crate::handlers::service_role::ServiceRole;
use crate::state::AppState;
use crate::usecase::sweep::{ProcessDeletionsUseCase, SweepSummary};

#[derive(Serialize)]
pub struct SweepResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(flatten)]
    pub summary: SweepSummary,
}

impl From<SweepSummary> for SweepResponse {
    fn from(summary: SweepSummary) -> Self {
        let message = summary
            .results
            .is_empty()
            .then_some("No pending deletions to process");
        Self {
            success: true,
            message,
            summary,
        }
    }
}

// ── POST /functions/process-account-deletions ────────────────────────────────

pub async fn process_deletions(
    State(state): State<AppState>,
    _caller: ServiceRole,
) -> Result<Json<SweepResponse>, AccountServiceError> {
    let usecase = ProcessDeletionsUseCase {
        deletions: state.deletion_repo(),
        account_data: state.account_data_repo(),
        identity: state.identity.clone(),
        mailer: state.mailer.clone(),
        stale_after: state.stale_after,
    };
    let summary = usecase.execute().await?;
    Ok(Json(summary.into()))
}
