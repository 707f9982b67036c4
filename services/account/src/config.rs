use serde::Deserialize;

use meridian_core::config::Config;

use crate::domain::types::{DEFAULT_GRACE_DAYS, DEFAULT_STALE_PROCESSING_SECS};

/// Account service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AccountConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `ACCOUNT_PORT`.
    #[serde(default = "default_port")]
    pub account_port: u16,
    /// Secret the scheduler presents in `Authorization` to run the sweep.
    pub service_role_key: String,
    /// Identity provider base URL (admin API lives under `/auth/v1/admin`).
    pub identity_url: String,
    pub identity_admin_key: String,
    #[serde(default = "default_email_api_url")]
    pub email_api_url: String,
    pub email_api_key: String,
    /// Sender address, e.g. `Meridian <no-reply@example.com>`.
    pub email_from: String,
    pub captcha_secret: String,
    #[serde(default = "default_captcha_verify_url")]
    pub captcha_verify_url: String,
    #[serde(default = "default_grace_days")]
    pub deletion_grace_days: i64,
    /// Age after which a `processing` request is reclaimed by the sweep.
    #[serde(default = "default_stale_processing_secs")]
    pub stale_processing_secs: i64,
}

impl Config for AccountConfig {}

impl AccountConfig {
    pub fn grace_period(&self) -> chrono::Duration {
        chrono::Duration::days(self.deletion_grace_days)
    }

    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.stale_processing_secs)
    }
}

fn default_port() -> u16 {
    3114
}

fn default_email_api_url() -> String {
    "https://api.resend.com".to_owned()
}

fn default_captcha_verify_url() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_owned()
}

fn default_grace_days() -> i64 {
    DEFAULT_GRACE_DAYS
}

fn default_stale_processing_secs() -> i64 {
    DEFAULT_STALE_PROCESSING_SECS
}
