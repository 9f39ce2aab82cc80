// Transactional email via the Resend HTTP API

pub mod templates;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

pub use templates::{EmailTemplates, SubmissionUpdateEmail, SupportResponseEmail};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resend API error: {status} {body}")]
    Api { status: u16, body: String },
}

/// A rendered email ready to send
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends rendered emails; without an API key messages are logged and dropped
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    api_key: Option<String>,
    from: String,
    templates: Arc<EmailTemplates>,
}

impl Mailer {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            templates: Arc::new(EmailTemplates::new()?),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one email through Resend
    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!(to = %email.to, subject = %email.subject, "Email delivery disabled; skipping");
            return Ok(());
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&ResendRequest {
                from: &self.from,
                to: [&email.to],
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %email.to, "Email sent");
        Ok(())
    }

    /// Send on a background task; failures are logged only
    pub fn send_in_background(&self, email: OutgoingEmail) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&email).await {
                error!(to = %email.to, subject = %email.subject, "Failed to send email: {}", e);
            }
        });
    }

    /// Render and queue the support-response email
    pub fn send_support_response(&self, to: &str, context: &SupportResponseEmail) {
        match self.templates.support_response(context) {
            Ok(html) => self.send_in_background(OutgoingEmail {
                to: to.to_string(),
                subject: format!("Response to Your Support Request: {}", context.message_subject),
                html,
            }),
            Err(e) => error!("Failed to render support response email: {}", e),
        }
    }

    /// Render and queue a submission update email
    pub fn send_submission_update(&self, to: &str, context: &SubmissionUpdateEmail) {
        match self.templates.submission_update(context) {
            Ok(html) => self.send_in_background(OutgoingEmail {
                to: to.to_string(),
                subject: context.title.clone(),
                html,
            }),
            Err(e) => error!("Failed to render submission update email: {}", e),
        }
    }
}
