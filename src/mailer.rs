// src/mailer.rs

use crate::templates::Report;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    Api(String),
}

/// Last stage of a run: delivers the rendered report somewhere a human reads it.
pub trait Notifier {
    fn send(&self, report: &Report) -> Result<(), MailerError>;
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
    pub recipient_email: String,
}

pub struct BrevoMailer {
    config: MailConfig,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

impl BrevoMailer {
    pub fn new(config: MailConfig, timeout: Duration) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        Ok(Self { config, client })
    }
}

impl Notifier for BrevoMailer {
    fn send(&self, report: &Report) -> Result<(), MailerError> {
        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.config.sender_name,
                email: &self.config.sender_email,
            },
            to: vec![BrevoRecipient {
                email: &self.config.recipient_email,
            }],
            subject: &report.subject,
            html_content: &report.html,
        };

        let resp = self
            .client
            .post(BREVO_ENDPOINT)
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::Api(format!(
                "Brevo returned {status}: {error_body}"
            )));
        }

        info!(to = %self.config.recipient_email, subject = %report.subject, "email sent successfully");
        Ok(())
    }
}

/// Used when no mail credentials are configured; the report only goes to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, report: &Report) -> Result<(), MailerError> {
        info!(subject = %report.subject, body = %report.html, "mail not configured, report logged instead");
        Ok(())
    }
}
