use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::DeletionRequestRepository;
use crate::domain::types::{DeletionRequest, DeletionStatus};
use crate::error::AccountServiceError;

// ── RequestDeletion ──────────────────────────────────────────────────────────

pub struct RequestDeletionUseCase<D: DeletionRequestRepository> {
    pub deletions: D,
    pub grace_period: Duration,
}

impl<D: DeletionRequestRepository> RequestDeletionUseCase<D> {
    pub async fn execute(&self, user_id: Uuid) -> Result<DeletionRequest, AccountServiceError> {
        if self.deletions.find_active(user_id).await?.is_some() {
            return Err(AccountServiceError::DeletionAlreadyRequested);
        }
        let now = Utc::now();
        let request = DeletionRequest {
            id: Uuid::now_v7(),
            user_id,
            status: DeletionStatus::Scheduled,
            scheduled_for: now + self.grace_period,
            processing_started_at: None,
            completed_at: None,
            notes: None,
            created_at: now,
        };
        self.deletions.create(&request).await?;
        Ok(request)
    }
}

// ── GetDeletion ──────────────────────────────────────────────────────────────

pub struct GetDeletionUseCase<D: DeletionRequestRepository> {
    pub deletions: D,
}

impl<D: DeletionRequestRepository> GetDeletionUseCase<D> {
    pub async fn execute(&self, user_id: Uuid) -> Result<DeletionRequest, AccountServiceError> {
        self.deletions
            .find_active(user_id)
            .await?
            .ok_or(AccountServiceError::DeletionRequestNotFound)
    }
}

// ── CancelDeletion ───────────────────────────────────────────────────────────

pub struct CancelDeletionUseCase<D: DeletionRequestRepository> {
    pub deletions: D,
}

impl<D: DeletionRequestRepository> CancelDeletionUseCase<D> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AccountServiceError> {
        let request = self
            .deletions
            .find_active(user_id)
            .await?
            .ok_or(AccountServiceError::DeletionRequestNotFound)?;
        if request.status == DeletionStatus::Processing {
            return Err(AccountServiceError::DeletionInProgress);
        }
        // A sweep may claim the request between the read and the delete.
        if !self.deletions.delete_scheduled(request.id).await? {
            return Err(AccountServiceError::DeletionInProgress);
        }
        Ok(())
    }
}
