use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which second-factor credential a verification call presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Totp,
    Backup,
}

impl CodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Totp => "totp",
            Self::Backup => "backup",
        }
    }
}

impl FromStr for CodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "totp" => Ok(Self::Totp),
            "backup" => Ok(Self::Backup),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's enabled TOTP enrolment. Backup codes are not loaded here; they
/// are redeemed directly in storage.
#[derive(Debug, Clone)]
pub struct TwoFactorCredential {
    pub user_id: Uuid,
    /// Base32 shared secret.
    pub secret: String,
    pub enabled: bool,
    pub last_verified_at: Option<DateTime<Utc>>,
}

/// Why a verification attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoSetup,
    InvalidCode,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSetup => "no 2FA setup found",
            Self::InvalidCode => "invalid code",
        }
    }
}

/// Requester network/client metadata recorded with each attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Append-only audit record, one per verification call that passed input
/// validation.
#[derive(Debug, Clone)]
pub struct VerificationAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub success: bool,
    pub failure_reason: Option<FailureReason>,
    pub kind: CodeKind,
    pub client: ClientMeta,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionStatus {
    Scheduled,
    Processing,
    Completed,
}

/// Pending or finished account erasure.
#[derive(Debug, Clone)]
pub struct DeletionRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: DeletionStatus,
    pub scheduled_for: DateTime<Utc>,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DeletionRequest {
    /// Scheduled or processing; a user may have at most one.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            DeletionStatus::Scheduled | DeletionStatus::Processing
        )
    }
}

/// Contact details captured before the identity record is erased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSnapshot {
    pub email: String,
    pub language: String,
}

/// Per-user tables cleared during erasure. Rows are stamped with
/// `deleted_at`, except backup code hashes, which have no such column and
/// are removed outright.
///
/// Entitlements are deliberately absent: a user's purchase and access
/// history survives account deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftDeleteTable {
    Preferences,
    Notifications,
    LoginActivity,
    BackupCodes,
    TwoFactorCredentials,
    Sessions,
    Profile,
}

impl SoftDeleteTable {
    /// Erasure order. Profile goes last; the contact snapshot is taken first.
    pub const ALL: [SoftDeleteTable; 7] = [
        Self::Preferences,
        Self::Notifications,
        Self::LoginActivity,
        Self::BackupCodes,
        Self::TwoFactorCredentials,
        Self::Sessions,
        Self::Profile,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::Preferences => "user_preferences",
            Self::Notifications => "notifications",
            Self::LoginActivity => "login_activity",
            Self::BackupCodes => "backup_codes",
            Self::TwoFactorCredentials => "two_factor_credentials",
            Self::Sessions => "sessions",
            Self::Profile => "profiles",
        }
    }
}

/// TOTP code length.
pub const TOTP_DIGITS: u32 = 6;

/// TOTP period in seconds.
pub const TOTP_STEP_SECS: u64 = 30;

/// Accepted drift either side of the current step.
pub const TOTP_SKEW_STEPS: i64 = 1;

/// Default grace period between a deletion request and erasure.
pub const DEFAULT_GRACE_DAYS: i64 = 30;

/// A `processing` request untouched for this long is reclaimed by the sweep.
pub const DEFAULT_STALE_PROCESSING_SECS: i64 = 3600;

/// Language used when the profile has none or an unsupported one.
pub const DEFAULT_LANGUAGE: &str = "en";
