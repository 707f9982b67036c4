use anyhow::Context as _;
use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::domain::types::{ContactSnapshot, DEFAULT_LANGUAGE};
use crate::error::AccountServiceError;

/// Localised subject and HTML body of the "account deleted" email.
#[derive(Debug, PartialEq, Eq)]
pub struct DeletionEmail {
    pub subject: &'static str,
    pub html: &'static str,
}

/// Pick the template for a stored language preference. Region suffixes are
/// ignored (`fr-CA` → `fr`); anything unsupported falls back to English.
pub fn deletion_email(language: &str) -> DeletionEmail {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_ascii_lowercase();
    match primary.as_str() {
        "fr" => DeletionEmail {
            subject: "Votre compte a été supprimé",
            html: "<p>Bonjour,</p><p>Votre compte et vos données personnelles ont été supprimés comme demandé. Vos achats restent enregistrés.</p><p>Merci d'avoir utilisé nos services.</p>",
        },
        "es" => DeletionEmail {
            subject: "Tu cuenta ha sido eliminada",
            html: "<p>Hola,</p><p>Tu cuenta y tus datos personales han sido eliminados según lo solicitado. Tus compras siguen registradas.</p><p>Gracias por usar nuestros servicios.</p>",
        },
        "de" => DeletionEmail {
            subject: "Ihr Konto wurde gelöscht",
            html: "<p>Hallo,</p><p>Ihr Konto und Ihre persönlichen Daten wurden wie gewünscht gelöscht. Ihre Käufe bleiben erhalten.</p><p>Vielen Dank, dass Sie unsere Dienste genutzt haben.</p>",
        },
        _ => DeletionEmail {
            subject: "Your account has been deleted",
            html: "<p>Hello,</p><p>Your account and personal data have been deleted as requested. Your purchases remain on record.</p><p>Thank you for using our services.</p>",
        },
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Transactional email through a Resend-compatible `POST /emails` API.
#[derive(Clone)]
pub struct HttpMailer {
    pub client: Client,
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

impl Mailer for HttpMailer {
    async fn send_deletion_completed(
        &self,
        contact: &ContactSnapshot,
    ) -> Result<(), AccountServiceError> {
        let email = deletion_email(&contact.language);
        let url = format!("{}/emails", self.api_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&SendEmailRequest {
                from: &self.from,
                to: [contact.email.as_str()],
                subject: email.subject,
                html: email.html,
            })
            .send()
            .await
            .context("send deletion email")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("email provider returned {status}: {body}").into());
        }
        Ok(())
    }
}
