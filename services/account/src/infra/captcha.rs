use anyhow::Context as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::repository::CaptchaVerifier;
use crate::domain::types::ClientMeta;
use crate::error::AccountServiceError;

#[derive(Serialize)]
struct SiteverifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remoteip: Option<&'a str>,
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Siteverify client (Cloudflare Turnstile by default; hCaptcha and
/// reCAPTCHA accept the same fields).
#[derive(Clone)]
pub struct HttpCaptchaVerifier {
    pub client: Client,
    pub verify_url: String,
    pub secret: String,
}

impl CaptchaVerifier for HttpCaptchaVerifier {
    async fn verify(&self, token: &str, client: &ClientMeta) -> Result<bool, AccountServiceError> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&SiteverifyRequest {
                secret: &self.secret,
                response: token,
                remoteip: client.ip_address.as_deref(),
            })
            .send()
            .await
            .context("captcha siteverify request")?
            .error_for_status()
            .context("captcha siteverify status")?;

        let result: SiteverifyResponse = response
            .json()
            .await
            .context("decode captcha siteverify response")?;
        if !result.success {
            info!(error_codes = ?result.error_codes, "captcha rejected");
        }
        Ok(result.success)
    }
}
