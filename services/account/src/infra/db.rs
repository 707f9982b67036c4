use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    DeleteMany, EntityTrait, QueryFilter, QueryOrder, SqlErr, UpdateMany, sea_query::Expr,
};
use uuid::Uuid;

use meridian_account_schema::account_deletion_requests::{self, DeletionStatus as DbStatus};
use meridian_account_schema::{
    backup_codes, login_activity, notifications, profiles, sessions, two_factor_credentials,
    user_preferences, verification_attempts,
};

use crate::domain::repository::{
    AccountDataRepository, DeletionRequestRepository, TwoFactorRepository,
    VerificationAttemptRepository,
};
use crate::domain::types::{
    ContactSnapshot, DeletionRequest, DeletionStatus, SoftDeleteTable, TwoFactorCredential,
    VerificationAttempt,
};
use crate::error::AccountServiceError;

// ── Two-factor repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTwoFactorRepository {
    pub db: DatabaseConnection,
}

impl TwoFactorRepository for DbTwoFactorRepository {
    async fn find_enabled(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TwoFactorCredential>, AccountServiceError> {
        let model = two_factor_credentials::Entity::find_by_id(user_id)
            .filter(two_factor_credentials::Column::Enabled.eq(true))
            .filter(two_factor_credentials::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find 2FA credential")?;
        Ok(model.map(credential_from_model))
    }

    async fn consume_backup_code(
        &self,
        user_id: Uuid,
        code_hash: &str,
    ) -> Result<bool, AccountServiceError> {
        // A single DELETE: concurrent redemptions of the same code serialize
        // on the row and only one of them sees it deleted.
        let result = redeem_backup_code(user_id, code_hash)
            .exec(&self.db)
            .await
            .context("consume backup code")?;
        Ok(result.rows_affected == 1)
    }

    async fn touch_last_verified(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AccountServiceError> {
        two_factor_credentials::Entity::update_many()
            .col_expr(
                two_factor_credentials::Column::LastVerifiedAt,
                Expr::value(at),
            )
            .filter(two_factor_credentials::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("update 2FA last_verified_at")?;
        Ok(())
    }
}

fn redeem_backup_code(user_id: Uuid, code_hash: &str) -> DeleteMany<backup_codes::Entity> {
    backup_codes::Entity::delete_many()
        .filter(backup_codes::Column::UserId.eq(user_id))
        .filter(backup_codes::Column::CodeHash.eq(code_hash))
}

fn credential_from_model(model: two_factor_credentials::Model) -> TwoFactorCredential {
    TwoFactorCredential {
        user_id: model.user_id,
        secret: model.secret,
        enabled: model.enabled,
        last_verified_at: model.last_verified_at,
    }
}

// ── Verification attempt log ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationAttemptRepository {
    pub db: DatabaseConnection,
}

impl VerificationAttemptRepository for DbVerificationAttemptRepository {
    async fn record(&self, attempt: &VerificationAttempt) -> Result<(), AccountServiceError> {
        verification_attempts::ActiveModel {
            id: Set(attempt.id),
            user_id: Set(attempt.user_id),
            success: Set(attempt.success),
            failure_reason: Set(attempt.failure_reason.map(|r| r.as_str().to_owned())),
            kind: Set(attempt.kind.as_str().to_owned()),
            ip_address: Set(attempt.client.ip_address.clone()),
            user_agent: Set(attempt.client.user_agent.clone()),
            created_at: Set(attempt.created_at),
        }
        .insert(&self.db)
        .await
        .context("record verification attempt")?;
        Ok(())
    }
}

// ── Deletion request repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeletionRequestRepository {
    pub db: DatabaseConnection,
}

/// Due `scheduled` requests, or `processing` ones abandoned before `stale_before`.
fn claimable(now: DateTime<Utc>, stale_before: DateTime<Utc>) -> Condition {
    use account_deletion_requests::Column;
    Condition::any()
        .add(
            Condition::all()
                .add(Column::Status.eq(DbStatus::Scheduled))
                .add(Column::ScheduledFor.lte(now)),
        )
        .add(
            Condition::all()
                .add(Column::Status.eq(DbStatus::Processing))
                .add(Column::ProcessingStartedAt.lt(stale_before)),
        )
}

fn claim_request(
    id: Uuid,
    now: DateTime<Utc>,
    stale_before: DateTime<Utc>,
) -> UpdateMany<account_deletion_requests::Entity> {
    use account_deletion_requests::Column;
    account_deletion_requests::Entity::update_many()
        .col_expr(Column::Status, Expr::value(DbStatus::Processing))
        .col_expr(Column::ProcessingStartedAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(claimable(now, stale_before))
}

/// Update scoped to the claim taken at `claimed_at`. Once another sweep has
/// reclaimed or finished the request, it matches nothing.
fn under_claim(
    id: Uuid,
    claimed_at: DateTime<Utc>,
) -> UpdateMany<account_deletion_requests::Entity> {
    use account_deletion_requests::Column;
    account_deletion_requests::Entity::update_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(DbStatus::Processing))
        .filter(Column::ProcessingStartedAt.eq(claimed_at))
}

impl DeletionRequestRepository for DbDeletionRequestRepository {
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<DeletionRequest>, AccountServiceError> {
        let models = account_deletion_requests::Entity::find()
            .filter(claimable(now, stale_before))
            .order_by_asc(account_deletion_requests::Column::ScheduledFor)
            .all(&self.db)
            .await
            .context("find due deletion requests")?;
        Ok(models.into_iter().map(deletion_from_model).collect())
    }

    async fn claim(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, AccountServiceError> {
        let result = claim_request(id, now, stale_before)
            .exec(&self.db)
            .await
            .context("claim deletion request")?;
        Ok(result.rows_affected == 1)
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        claimed_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountServiceError> {
        use account_deletion_requests::Column;
        let result = under_claim(id, claimed_at)
            .col_expr(Column::Status, Expr::value(DbStatus::Completed))
            .col_expr(Column::CompletedAt, Expr::value(at))
            .col_expr(Column::UpdatedAt, Expr::value(at))
            .exec(&self.db)
            .await
            .context("mark deletion request completed")?;
        if result.rows_affected != 1 {
            return Err(anyhow::anyhow!("deletion request {id} is no longer processing").into());
        }
        Ok(())
    }

    async fn revert_to_scheduled(
        &self,
        id: Uuid,
        claimed_at: DateTime<Utc>,
        note: &str,
    ) -> Result<bool, AccountServiceError> {
        let result = revert_request(id, claimed_at, note, Utc::now())
            .exec(&self.db)
            .await
            .context("revert deletion request")?;
        Ok(result.rows_affected == 1)
    }

    async fn find_active(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DeletionRequest>, AccountServiceError> {
        use account_deletion_requests::Column;
        let model = account_deletion_requests::Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.is_in([DbStatus::Scheduled, DbStatus::Processing]))
            .one(&self.db)
            .await
            .context("find active deletion request")?;
        Ok(model.map(deletion_from_model))
    }

    async fn create(&self, request: &DeletionRequest) -> Result<(), AccountServiceError> {
        account_deletion_requests::ActiveModel {
            id: Set(request.id),
            user_id: Set(request.user_id),
            status: Set(status_to_db(request.status)),
            scheduled_for: Set(request.scheduled_for),
            processing_started_at: Set(request.processing_started_at),
            completed_at: Set(request.completed_at),
            notes: Set(request.notes.clone()),
            created_at: Set(request.created_at),
            updated_at: Set(request.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(map_create_err)?;
        Ok(())
    }

    async fn delete_scheduled(&self, id: Uuid) -> Result<bool, AccountServiceError> {
        use account_deletion_requests::Column;
        let result = account_deletion_requests::Entity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(DbStatus::Scheduled))
            .exec(&self.db)
            .await
            .context("delete scheduled deletion request")?;
        Ok(result.rows_affected == 1)
    }
}

fn revert_request(
    id: Uuid,
    claimed_at: DateTime<Utc>,
    note: &str,
    now: DateTime<Utc>,
) -> UpdateMany<account_deletion_requests::Entity> {
    use account_deletion_requests::Column;
    under_claim(id, claimed_at)
        .col_expr(Column::Status, Expr::value(DbStatus::Scheduled))
        .col_expr(Column::ProcessingStartedAt, Expr::value(None::<DateTime<Utc>>))
        .col_expr(Column::Notes, Expr::value(note))
        .col_expr(Column::UpdatedAt, Expr::value(now))
}

/// The partial unique index on active requests turns a racing duplicate
/// into a conflict rather than a 500.
fn map_create_err(err: DbErr) -> AccountServiceError {
    let sql_err = err.sql_err();
    create_error(sql_err, err)
}

fn create_error(sql_err: Option<SqlErr>, err: DbErr) -> AccountServiceError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountServiceError::DeletionAlreadyRequested,
        _ => AccountServiceError::Internal(anyhow::Error::new(err).context("create deletion request")),
    }
}

fn status_to_db(status: DeletionStatus) -> DbStatus {
    match status {
        DeletionStatus::Scheduled => DbStatus::Scheduled,
        DeletionStatus::Processing => DbStatus::Processing,
        DeletionStatus::Completed => DbStatus::Completed,
    }
}

fn status_from_db(status: DbStatus) -> DeletionStatus {
    match status {
        DbStatus::Scheduled => DeletionStatus::Scheduled,
        DbStatus::Processing => DeletionStatus::Processing,
        DbStatus::Completed => DeletionStatus::Completed,
    }
}

fn deletion_from_model(model: account_deletion_requests::Model) -> DeletionRequest {
    DeletionRequest {
        id: model.id,
        user_id: model.user_id,
        status: status_from_db(model.status),
        scheduled_for: model.scheduled_for,
        processing_started_at: model.processing_started_at,
        completed_at: model.completed_at,
        notes: model.notes,
        created_at: model.created_at,
    }
}

// ── Account data repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountDataRepository {
    pub db: DatabaseConnection,
}

/// `UPDATE <table> SET deleted_at = $at WHERE user_id = $id AND deleted_at IS NULL`.
fn stamp_deleted_query<E>(
    user_col: E::Column,
    deleted_col: E::Column,
    user_id: Uuid,
    at: DateTime<Utc>,
) -> UpdateMany<E>
where
    E: EntityTrait,
{
    E::update_many()
        .col_expr(deleted_col, Expr::value(at))
        .filter(user_col.eq(user_id))
        .filter(deleted_col.is_null())
}

async fn stamp_deleted<E>(
    db: &DatabaseConnection,
    user_col: E::Column,
    deleted_col: E::Column,
    user_id: Uuid,
    at: DateTime<Utc>,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
{
    let result = stamp_deleted_query::<E>(user_col, deleted_col, user_id, at)
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Backup code hashes carry no `deleted_at`; erasure removes them.
fn purge_backup_codes(user_id: Uuid) -> DeleteMany<backup_codes::Entity> {
    backup_codes::Entity::delete_many().filter(backup_codes::Column::UserId.eq(user_id))
}

impl AccountDataRepository for DbAccountDataRepository {
    async fn contact_snapshot(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ContactSnapshot>, AccountServiceError> {
        // Soft-deleted profiles still count: a retried erasure needs the email.
        let model = profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("load contact snapshot")?;
        Ok(model.map(|p| ContactSnapshot {
            email: p.email,
            language: p.language,
        }))
    }

    async fn soft_delete(
        &self,
        table: SoftDeleteTable,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, AccountServiceError> {
        let db = &self.db;
        let stamped = match table {
            SoftDeleteTable::Preferences => {
                stamp_deleted::<user_preferences::Entity>(
                    db,
                    user_preferences::Column::UserId,
                    user_preferences::Column::DeletedAt,
                    user_id,
                    at,
                )
                .await
            }
            SoftDeleteTable::Notifications => {
                stamp_deleted::<notifications::Entity>(
                    db,
                    notifications::Column::UserId,
                    notifications::Column::DeletedAt,
                    user_id,
                    at,
                )
                .await
            }
            SoftDeleteTable::LoginActivity => {
                stamp_deleted::<login_activity::Entity>(
                    db,
                    login_activity::Column::UserId,
                    login_activity::Column::DeletedAt,
                    user_id,
                    at,
                )
                .await
            }
            SoftDeleteTable::BackupCodes => purge_backup_codes(user_id)
                .exec(db)
                .await
                .map(|r| r.rows_affected),
            SoftDeleteTable::TwoFactorCredentials => {
                stamp_deleted::<two_factor_credentials::Entity>(
                    db,
                    two_factor_credentials::Column::UserId,
                    two_factor_credentials::Column::DeletedAt,
                    user_id,
                    at,
                )
                .await
            }
            SoftDeleteTable::Sessions => {
                stamp_deleted::<sessions::Entity>(
                    db,
                    sessions::Column::UserId,
                    sessions::Column::DeletedAt,
                    user_id,
                    at,
                )
                .await
            }
            SoftDeleteTable::Profile => {
                stamp_deleted::<profiles::Entity>(
                    db,
                    profiles::Column::UserId,
                    profiles::Column::DeletedAt,
                    user_id,
                    at,
                )
                .await
            }
        };
        let stamped = stamped.with_context(|| format!("soft delete {}", table.table_name()))?;
        Ok(stamped)
    }
}
