use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::repository::{
    AccountDataRepository, DeletionRequestRepository, IdentityProvider, Mailer,
};
use crate::domain::types::{ContactSnapshot, DeletionRequest, SoftDeleteTable};
use crate::error::AccountServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Completed,
    Failed,
    /// Claimed by a concurrent sweep between selection and claim.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepItemResult {
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub notification_sent: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct SweepSummary {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<SweepItemResult>,
}

/// One pass of the account eraser over every due deletion request.
pub struct ProcessDeletionsUseCase<D, A, I, M>
where
    D: DeletionRequestRepository,
    A: AccountDataRepository,
    I: IdentityProvider,
    M: Mailer,
{
    pub deletions: D,
    pub account_data: A,
    pub identity: I,
    pub mailer: M,
    /// `processing` requests older than this are considered abandoned.
    pub stale_after: Duration,
}

impl<D, A, I, M> ProcessDeletionsUseCase<D, A, I, M>
where
    D: DeletionRequestRepository,
    A: AccountDataRepository,
    I: IdentityProvider,
    M: Mailer,
{
    /// Only a failure to load the backlog is returned as an error; per-item
    /// failures are reported in the summary.
    pub async fn execute(&self) -> Result<SweepSummary, AccountServiceError> {
        let now = Utc::now();
        let stale_before = now - self.stale_after;
        let due = self.deletions.find_due(now, stale_before).await?;

        let mut summary = SweepSummary::default();
        for request in &due {
            let result = self.process(request, stale_before).await;
            match result.status {
                ItemStatus::Completed => summary.processed += 1,
                ItemStatus::Failed => summary.failed += 1,
                ItemStatus::Skipped => summary.skipped += 1,
            }
            summary.results.push(result);
        }

        info!(
            due = due.len(),
            processed = summary.processed,
            failed = summary.failed,
            skipped = summary.skipped,
            "deletion sweep finished"
        );
        Ok(summary)
    }

    async fn process(
        &self,
        request: &DeletionRequest,
        stale_before: DateTime<Utc>,
    ) -> SweepItemResult {
        let mut result = SweepItemResult {
            request_id: request.id,
            user_id: request.user_id,
            status: ItemStatus::Completed,
            error: None,
            notification_sent: false,
        };

        // Microseconds, so the stamp compares equal once stored.
        let claimed_at = Utc::now().trunc_subsecs(6);
        match self
            .deletions
            .claim(request.id, claimed_at, stale_before)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                result.status = ItemStatus::Skipped;
                return result;
            }
            // Nothing was changed, so there is nothing to revert.
            Err(e) => {
                warn!(request_id = %request.id, error = %e.detail(), "failed to claim deletion request");
                result.status = ItemStatus::Failed;
                result.error = Some(e.detail());
                return result;
            }
        }

        let contact = match self.erase(request, claimed_at).await {
            Ok(contact) => contact,
            Err(e) => {
                let detail = e.detail();
                warn!(
                    request_id = %request.id,
                    user_id = %request.user_id,
                    error = %detail,
                    "account deletion failed, rescheduling"
                );
                match self
                    .deletions
                    .revert_to_scheduled(
                        request.id,
                        claimed_at,
                        &format!("deletion failed: {detail}"),
                    )
                    .await
                {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(request_id = %request.id, "claim lost to another sweep, leaving request as is");
                    }
                    Err(revert_err) => {
                        warn!(
                            request_id = %request.id,
                            error = %revert_err.detail(),
                            "failed to revert deletion request"
                        );
                    }
                }
                result.status = ItemStatus::Failed;
                result.error = Some(detail);
                return result;
            }
        };

        // Terminal state is already persisted; delivery is best-effort.
        if let Some(contact) = contact {
            match self.mailer.send_deletion_completed(&contact).await {
                Ok(()) => result.notification_sent = true,
                Err(e) => {
                    warn!(request_id = %request.id, error = %e.detail(), "deletion email not sent");
                }
            }
        }
        result
    }

    /// Steps between claim and completion. Every step is safe to repeat, so a
    /// failed request can simply be retried from the top on the next sweep.
    async fn erase(
        &self,
        request: &DeletionRequest,
        claimed_at: DateTime<Utc>,
    ) -> Result<Option<ContactSnapshot>, AccountServiceError> {
        let user_id = request.user_id;
        let contact = self.account_data.contact_snapshot(user_id).await?;

        let at = Utc::now();
        for table in SoftDeleteTable::ALL {
            self.account_data.soft_delete(table, user_id, at).await?;
        }

        self.identity.delete_user(user_id).await?;
        self.deletions
            .mark_completed(request.id, claimed_at, Utc::now())
            .await?;
        Ok(contact)
    }
}
