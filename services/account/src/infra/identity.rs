use anyhow::Context as _;
use reqwest::{Client, StatusCode};
use uuid::Uuid;

use crate::domain::repository::IdentityProvider;
use crate::error::AccountServiceError;

/// Admin client for the hosted identity provider.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    pub client: Client,
    pub base_url: String,
    pub admin_key: String,
}

impl HttpIdentityProvider {
    fn user_url(&self, user_id: Uuid) -> String {
        format!(
            "{}/auth/v1/admin/users/{user_id}",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AccountServiceError> {
        let response = self
            .client
            .delete(self.user_url(user_id))
            .header("apikey", &self.admin_key)
            .bearer_auth(&self.admin_key)
            .send()
            .await
            .context("identity admin delete request")?;

        let status = response.status();
        // A retried sweep may find the identity already gone.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(anyhow::anyhow!("identity admin delete returned {status}: {body}").into())
    }
}
