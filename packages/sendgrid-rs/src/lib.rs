// Minimal client for the SendGrid v3 mail API.

pub mod models;

use reqwest::{header, Client};
use thiserror::Error;

use crate::models::{ApiErrorResponse, MailSendRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

#[derive(Debug, Clone)]
pub struct SendGridOptions {
    pub api_key: String,
    pub sender_email: String,
    /// Overridable for tests and regional endpoints.
    pub base_url: String,
}

impl SendGridOptions {
    pub fn new(api_key: impl Into<String>, sender_email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sender_email: sender_email.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SendGridError {
    #[error("request to SendGrid failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("SendGrid returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct SendGridService {
    options: SendGridOptions,
    client: Client,
}

impl SendGridService {
    pub fn new(options: SendGridOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    pub fn sender_email(&self) -> &str {
        &self.options.sender_email
    }

    /// Send one HTML email. Any 2xx status counts as accepted.
    pub async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), SendGridError> {
        let url = format!("{}/v3/mail/send", self.options.base_url.trim_end_matches('/'));
        let body = MailSendRequest::html(&self.options.sender_email, recipient, subject, html_content);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.options.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let raw = response.text().await.unwrap_or_default();
        Err(SendGridError::Api {
            status: status.as_u16(),
            message: error_message(&raw),
        })
    }
}

/// Flatten the API's `errors[]` payload, falling back to the raw body.
fn error_message(raw: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(raw) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|e| match &e.field {
                Some(field) => format!("{}: {}", field, e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => raw.to_string(),
    }
}
