//! Outbound Email
//!
//! [`Mailer`] is the seam the domain crates send mail through. The
//! production implementation posts JSON to a transactional-email HTTP API
//! (`{from, to: [..], subject, text}` with a bearer key).

use serde::Serialize;
use thiserror::Error;

/// Plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl MailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Endpoint accepting the JSON payload, e.g. `https://api.resend.com/emails`
    pub api_url: String,
    /// `None` puts the mailer in dry-run mode: messages are logged, not sent
    pub api_key: Option<String>,
    pub from: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from: "FoodMed <no-reply@foodmed.app>".to_string(),
        }
    }
}

#[derive(Serialize)]
struct SendMailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// HTTP mail provider client
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(client: reqwest::Client, config: MailerConfig) -> Self {
        Self { client, config }
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.api_key.is_none()
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::info!(
                to = %message.to,
                subject = %message.subject,
                "Mailer in dry-run mode, message not sent"
            );
            return Ok(());
        };

        let body = SendMailBody {
            from: &self.config.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.text,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape() {
        let body = SendMailBody {
            from: "FoodMed <no-reply@foodmed.app>",
            to: ["ada@example.com"],
            subject: "Your FOODMED OTP Code",
            text: "Your OTP code is 123456",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["to"][0], "ada@example.com");
        assert_eq!(json["subject"], "Your FOODMED OTP Code");
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let mailer = HttpMailer::new(reqwest::Client::new(), MailerConfig::default());
        assert!(mailer.is_dry_run());

        let message = MailMessage::new("ada@example.com", "Hello", "Hi Ada");
        assert!(Mailer::send(&mailer, &message).await.is_ok());
    }
}
