pub mod resend;
pub mod templates;

pub use resend::ResendMailer;
pub use templates::{booking_notification, contact_notification, escape_html};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Used when delivery is switched off or no API key is present.
#[derive(Debug, Default, Clone)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(subject = %message.subject, "Email delivery disabled, skipping notification");
        Ok(())
    }
}

pub fn mailer_from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>> {
    if !config.email.enabled || config.email.api_key.is_empty() {
        return Ok(Arc::new(DisabledMailer));
    }

    if config.notification_recipients().is_empty() {
        warn!("Email is enabled but no recipients are configured");
        return Ok(Arc::new(DisabledMailer));
    }

    Ok(Arc::new(ResendMailer::from_config(&config.email)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_disabled_mailer_accepts_everything() {
        let message = EmailMessage {
            from: "a@x.com".to_string(),
            to: vec!["b@x.com".to_string()],
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        assert!(DisabledMailer.send(&message).await.is_ok());
    }

    fn message() -> EmailMessage {
        EmailMessage {
            from: "site@syntax.com.ng".to_string(),
            to: vec!["owner@syntax.com.ng".to_string()],
            subject: "New contact from Ada".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    fn config_for(server: &MockServer) -> AppConfig {
        let mut config = AppConfig::default();
        config.email.api_url = format!("{}/emails", server.uri());
        config.email.api_key = "re_123".to_string();
        config.admin.email = "owner@syntax.com.ng".to_string();
        config
    }

    #[tokio::test]
    async fn test_mailer_from_config_only_delivers_when_fully_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut without_key = config_for(&server);
        without_key.email.api_key.clear();

        let mut switched_off = config_for(&server);
        switched_off.email.enabled = false;

        let mut no_recipients = config_for(&server);
        no_recipients.admin.email.clear();
        no_recipients.email.to.clear();

        for config in [without_key, switched_off, no_recipients] {
            let mailer = mailer_from_config(&config).unwrap();
            mailer.send(&message()).await.unwrap();
        }

        let mailer = mailer_from_config(&config_for(&server)).unwrap();
        mailer.send(&message()).await.unwrap();
    }
}
