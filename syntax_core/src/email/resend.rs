//! Resend HTTP API backend.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::{EmailMessage, Mailer};
use crate::config::EmailConfig;
use crate::error::{AppError, Result};

pub struct ResendMailer {
    api_url: String,
    api_key: String,
    client: Client,
}

impl ResendMailer {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Email(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        Self::new(
            &config.api_url,
            &config.api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        debug!(subject = %message.subject, recipients = message.to.len(), "Sending email");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::Email(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Resend rejected email: {}", body);
            return Err(AppError::Email(format!("Resend returned {}: {}", status, body)));
        }

        Ok(())
    }
}
