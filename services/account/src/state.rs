use std::time::Duration;

use anyhow::Context as _;
use sea_orm::DatabaseConnection;

use crate::config::AccountConfig;
use crate::infra::captcha::HttpCaptchaVerifier;
use crate::infra::db::{
    DbAccountDataRepository, DbDeletionRequestRepository, DbTwoFactorRepository,
    DbVerificationAttemptRepository,
};
use crate::infra::identity::HttpIdentityProvider;
use crate::infra::mailer::HttpMailer;

/// Upper bound on any single outbound provider call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub service_role_key: String,
    pub identity: HttpIdentityProvider,
    pub mailer: HttpMailer,
    pub captcha: HttpCaptchaVerifier,
    pub grace_period: chrono::Duration,
    pub stale_after: chrono::Duration,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AccountConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            db,
            service_role_key: config.service_role_key.clone(),
            identity: HttpIdentityProvider {
                client: http.clone(),
                base_url: config.identity_url.clone(),
                admin_key: config.identity_admin_key.clone(),
            },
            mailer: HttpMailer {
                client: http.clone(),
                api_url: config.email_api_url.clone(),
                api_key: config.email_api_key.clone(),
                from: config.email_from.clone(),
            },
            captcha: HttpCaptchaVerifier {
                client: http,
                verify_url: config.captcha_verify_url.clone(),
                secret: config.captcha_secret.clone(),
            },
            grace_period: config.grace_period(),
            stale_after: config.stale_after(),
        })
    }

    pub fn two_factor_repo(&self) -> DbTwoFactorRepository {
        DbTwoFactorRepository {
            db: self.db.clone(),
        }
    }

    pub fn attempt_repo(&self) -> DbVerificationAttemptRepository {
        DbVerificationAttemptRepository {
            db: self.db.clone(),
        }
    }

    pub fn deletion_repo(&self) -> DbDeletionRequestRepository {
        DbDeletionRequestRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_data_repo(&self) -> DbAccountDataRepository {
        DbAccountDataRepository {
            db: self.db.clone(),
        }
    }
}
