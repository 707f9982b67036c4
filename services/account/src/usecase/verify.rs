use anyhow::Context as _;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::otp::{hash_backup_code, is_well_formed, verify_totp};
use crate::domain::repository::{TwoFactorRepository, VerificationAttemptRepository};
use crate::domain::types::{ClientMeta, CodeKind, FailureReason, VerificationAttempt};
use crate::error::AccountServiceError;

/// Raw verifier input as received; validated before any storage access.
pub struct VerifyCodeInput {
    pub user_id: Option<String>,
    pub code: Option<String>,
    /// `totp` when absent.
    pub kind: Option<String>,
    pub client: ClientMeta,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub kind: CodeKind,
}

struct ValidatedInput {
    user_id: Uuid,
    code: String,
    kind: CodeKind,
}

fn validate(input: VerifyCodeInput) -> Result<(ValidatedInput, ClientMeta), AccountServiceError> {
    let user_id = input.user_id.filter(|s| !s.is_empty());
    let code = input.code.filter(|s| !s.is_empty());
    let (Some(user_id), Some(code)) = (user_id, code) else {
        return Err(AccountServiceError::MissingFields);
    };
    let kind = match input.kind.as_deref() {
        None => CodeKind::Totp,
        Some(raw) => raw
            .parse()
            .map_err(|()| AccountServiceError::UnsupportedCodeType)?,
    };
    if !is_well_formed(kind, &code) {
        return Err(AccountServiceError::InvalidCodeFormat);
    }
    let user_id = user_id
        .parse()
        .map_err(|_| AccountServiceError::InvalidUserId)?;
    Ok((
        ValidatedInput {
            user_id,
            code,
            kind,
        },
        input.client,
    ))
}

fn unix_secs(now: DateTime<Utc>) -> Result<u64, AccountServiceError> {
    let secs = u64::try_from(now.timestamp()).context("system clock is before the unix epoch")?;
    Ok(secs)
}

pub struct VerifyCodeUseCase<C, A>
where
    C: TwoFactorRepository,
    A: VerificationAttemptRepository,
{
    pub credentials: C,
    pub attempts: A,
}

impl<C, A> VerifyCodeUseCase<C, A>
where
    C: TwoFactorRepository,
    A: VerificationAttemptRepository,
{
    pub async fn execute(
        &self,
        input: VerifyCodeInput,
    ) -> Result<VerifyCodeOutput, AccountServiceError> {
        // 1. Shape checks; malformed input leaves no trace in storage.
        let (input, client) = validate(input)?;

        // 2. Credential lookup; absence is itself an audited event.
        let Some(credential) = self.credentials.find_enabled(input.user_id).await? else {
            self.record(&input, client, Some(FailureReason::NoSetup))
                .await?;
            return Err(AccountServiceError::TwoFactorNotFound);
        };

        // 3. Verify. Backup codes are consumed in the same storage operation
        //    that checks them.
        let verified = match input.kind {
            CodeKind::Backup => {
                self.credentials
                    .consume_backup_code(input.user_id, &hash_backup_code(&input.code))
                    .await?
            }
            CodeKind::Totp => {
                let now = unix_secs(Utc::now())?;
                verify_totp(&credential.secret, &input.code, now)?
            }
        };

        if !verified {
            self.record(&input, client, Some(FailureReason::InvalidCode))
                .await?;
            info!(user_id = %input.user_id, kind = %input.kind, "2FA verification failed");
            return Err(AccountServiceError::InvalidCode);
        }

        // 4. Success bookkeeping. The audit row goes first: a consumed backup
        //    code must always leave a trace.
        self.record(&input, client, None).await?;
        self.credentials
            .touch_last_verified(input.user_id, Utc::now())
            .await?;

        Ok(VerifyCodeOutput { kind: input.kind })
    }

    async fn record(
        &self,
        input: &ValidatedInput,
        client: ClientMeta,
        failure: Option<FailureReason>,
    ) -> Result<(), AccountServiceError> {
        let attempt = VerificationAttempt {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            success: failure.is_none(),
            failure_reason: failure,
            kind: input.kind,
            client,
            created_at: Utc::now(),
        };
        self.attempts.record(&attempt).await
    }
}
