#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{
    ClientMeta, ContactSnapshot, DeletionRequest, SoftDeleteTable, TwoFactorCredential,
    VerificationAttempt,
};
use crate::error::AccountServiceError;

/// Repository for TOTP enrolments and their backup codes.
pub trait TwoFactorRepository: Send + Sync {
    /// Enabled, non-deleted credential for a user.
    async fn find_enabled(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TwoFactorCredential>, AccountServiceError>;

    /// Atomically remove one backup code by hash. Returns `true` only for the
    /// single caller whose removal took effect.
    async fn consume_backup_code(
        &self,
        user_id: Uuid,
        code_hash: &str,
    ) -> Result<bool, AccountServiceError>;

    async fn touch_last_verified(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AccountServiceError>;
}

/// Append-only verification audit log.
pub trait VerificationAttemptRepository: Send + Sync {
    async fn record(&self, attempt: &VerificationAttempt) -> Result<(), AccountServiceError>;
}

/// Repository for account deletion requests.
pub trait DeletionRequestRepository: Send + Sync {
    /// Requests the sweep should pick up, oldest `scheduled_for` first:
    /// `scheduled` with `scheduled_for <= now`, plus `processing` claimed
    /// before `stale_before`.
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<DeletionRequest>, AccountServiceError>;

    /// Move a request to `processing` if it is still claimable (same
    /// predicate as `find_due`). Returns `false` if another sweep won.
    async fn claim(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, AccountServiceError>;

    /// Finish the claim taken at `claimed_at`. Errors if the request is no
    /// longer held under that claim.
    async fn mark_completed(
        &self,
        id: Uuid,
        claimed_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountServiceError>;

    /// Return a failed request to `scheduled`, recording the reason in notes.
    /// Only applies while the claim taken at `claimed_at` still holds;
    /// returns `false` if another sweep has since reclaimed or finished it.
    async fn revert_to_scheduled(
        &self,
        id: Uuid,
        claimed_at: DateTime<Utc>,
        note: &str,
    ) -> Result<bool, AccountServiceError>;

    /// The user's `scheduled` or `processing` request, if any.
    async fn find_active(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DeletionRequest>, AccountServiceError>;

    async fn create(&self, request: &DeletionRequest) -> Result<(), AccountServiceError>;

    /// Remove a `scheduled` request. Returns `false` if none matched.
    async fn delete_scheduled(&self, id: Uuid) -> Result<bool, AccountServiceError>;
}

/// User-owned rows touched by erasure.
pub trait AccountDataRepository: Send + Sync {
    async fn contact_snapshot(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ContactSnapshot>, AccountServiceError>;

    /// Stamp `deleted_at` on the user's rows in `table` where it is still
    /// unset (backup codes are removed instead). Returns the number of rows
    /// affected.
    async fn soft_delete(
        &self,
        table: SoftDeleteTable,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, AccountServiceError>;
}

/// Port to the hosted identity provider's admin API.
pub trait IdentityProvider: Send + Sync {
    /// Hard-delete the identity record. Already-absent users are not an error.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AccountServiceError>;
}

/// Port to the transactional email provider.
pub trait Mailer: Send + Sync {
    async fn send_deletion_completed(
        &self,
        contact: &ContactSnapshot,
    ) -> Result<(), AccountServiceError>;
}

/// Port to the CAPTCHA provider's siteverify endpoint.
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, client: &ClientMeta) -> Result<bool, AccountServiceError>;
}
