//! Email service for transactional mail.
//!
//! Providers:
//! - `console`: logs emails instead of sending (development)
//! - `api`: posts to a Brevo-style HTTP JSON endpoint
//!
//! Delivery policy is the caller's: OTP delivery failures surface to the
//! user because they block activation; ticket confirmations are logged and
//! absorbed.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Email service for transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// Send an email message through the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "api" => self.send_api(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            is_html = message.is_html,
            "email (console provider):\n{}",
            message.body
        );
        Ok(())
    }

    async fn send_api(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.api_url.is_empty() || self.config.api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let mut to_entry = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            to_entry["name"] = serde_json::json!(name);
        }

        let mut body = serde_json::json!({
            "sender": {
                "name": self.config.from_name,
                "email": self.config.from_email,
            },
            "to": [to_entry],
            "subject": message.subject,
        });
        if message.is_html {
            body["htmlContent"] = serde_json::json!(message.body);
        } else {
            body["textContent"] = serde_json::json!(message.body);
        }

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::ProviderError(format!("{}: {}", status, detail)));
        }

        Ok(())
    }

    /// Send the signup verification code.
    pub async fn send_otp_email(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<(), EmailError> {
        let body = format!(
            r#"Hi {name},

Enter the code below into the required field.
The code will expire in {ttl} minutes.

Code: {code}

If you did not initiate this request, you can safely ignore this email.

From the Alumniverse Team"#,
            name = to_name,
            ttl = ttl_minutes,
            code = code,
        );

        self.send(EmailMessage {
            to: to_email.to_string(),
            to_name: Some(to_name.to_string()),
            subject: "Verify your email".to_string(),
            body,
            is_html: false,
        })
        .await
    }

    /// Send a ticket confirmation after a completed registration.
    pub async fn send_ticket_confirmation(
        &self,
        to_email: &str,
        user_name: &str,
        event_title: &str,
        event_date: &str,
        location: &str,
        ticket_uid: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            r#"Hi {name},

Your registration for {title} is confirmed.

When: {date}
Where: {location}
Ticket: {uid}

See you there!
The Alumniverse Team"#,
            name = user_name,
            title = event_title,
            date = event_date,
            location = location,
            uid = ticket_uid,
        );

        self.send(EmailMessage {
            to: to_email.to_string(),
            to_name: Some(user_name.to_string()),
            subject: format!("Confirmation: Your Ticket for {}", event_title),
            body,
            is_html: false,
        })
        .await
    }
}
