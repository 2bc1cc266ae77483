use crate::config::toml_config::{NotificationConfig, NotificationProvider};
use crate::domain::model::DeliveryOutcome;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Sends plain-text mail through the SendGrid v3 `mail/send` API.
pub struct SendGridNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
    sender: String,
    recipients: Vec<String>,
}

impl SendGridNotifier {
    pub fn new(
        endpoint: String,
        api_key: String,
        sender: String,
        recipients: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let mut unique: Vec<String> = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            if !unique.iter().any(|r| r.eq_ignore_ascii_case(&recipient)) {
                unique.push(recipient);
            }
        }

        Ok(Self {
            client,
            endpoint,
            api_key,
            sender,
            recipients: unique,
        })
    }

    fn payload(&self, subject: &str, body: &str) -> serde_json::Value {
        let to: Vec<serde_json::Value> = self
            .recipients
            .iter()
            .map(|email| serde_json::json!({ "email": email }))
            .collect();

        serde_json::json!({
            "personalizations": [{ "to": to }],
            "from": { "email": self.sender },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn notify(&self, subject: &str, body: &str) -> DeliveryOutcome {
        tracing::debug!(
            "Sending notification '{}' to {} recipients",
            subject,
            self.recipients.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(subject, body))
            .send()
            .await;

        match response {
            Ok(response) if response.status() == StatusCode::ACCEPTED => {
                tracing::info!("Email notification sent to the user.");
                DeliveryOutcome::Delivered
            }
            Ok(response) => {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                tracing::warn!(
                    "Email notification not sent to the user (status {}): {}",
                    status,
                    detail
                );
                DeliveryOutcome::NotDelivered(format!("mail API responded with {}", status))
            }
            Err(e) => {
                tracing::warn!("Email notification not sent to the user: {}", e);
                DeliveryOutcome::NotDelivered(e.to_string())
            }
        }
    }
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> DeliveryOutcome {
        tracing::info!("📧 {} | {}", subject, body.replace('\n', " "));
        DeliveryOutcome::Delivered
    }
}

/// The notifier selected by configuration at startup.
pub enum ConfiguredNotifier {
    SendGrid(SendGridNotifier),
    Log(LogNotifier),
}

impl ConfiguredNotifier {
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        if !config.enabled {
            tracing::info!("Email notifications disabled; outcomes will only be logged");
            return Ok(Self::Log(LogNotifier));
        }

        match config.provider {
            NotificationProvider::Log => Ok(Self::Log(LogNotifier)),
            NotificationProvider::SendGrid => Ok(Self::SendGrid(SendGridNotifier::new(
                config.endpoint.clone(),
                config.api_key.clone().unwrap_or_default(),
                config.sender.clone(),
                config.recipients.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?)),
        }
    }
}

#[async_trait]
impl Notifier for ConfiguredNotifier {
    async fn notify(&self, subject: &str, body: &str) -> DeliveryOutcome {
        match self {
            Self::SendGrid(notifier) => notifier.notify(subject, body).await,
            Self::Log(notifier) => notifier.notify(subject, body).await,
        }
    }
}
