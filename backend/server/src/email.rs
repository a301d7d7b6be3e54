//! # Email
//!
//! Organizer notification on every accepted confirmation.
//!
//! - Implicit TLS relay, defaults to Gmail on 465
//! - Sender and recipient are both the configured account unless `EMAIL_TO` is set
//! - Best-effort: the caller logs the outcome, guests never see it
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tokio::time::timeout;

use crate::config::{MailConfig, MailSender};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Disabled,
}

pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.sender.is_some()
    }

    pub async fn notify(&self, confirmed_name: &str) -> Result<Delivery, NotifyError> {
        let Some(sender) = &self.config.sender else {
            return Ok(Delivery::Disabled);
        };

        let message = compose(sender, &self.config.subject, confirmed_name)?;
        let transport = self.transport(sender)?;

        timeout(self.config.timeout, transport.send(message))
            .await
            .map_err(|_| NotifyError::Timeout(self.config.timeout.as_secs()))??;

        Ok(Delivery::Sent)
    }

    fn transport(
        &self,
        sender: &MailSender,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let credentials = Credentials::new(sender.username.clone(), sender.password.clone());

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .credentials(credentials)
                .timeout(Some(self.config.timeout))
                .build(),
        )
    }
}

fn body(confirmed_name: &str) -> String {
    format!("\nNova confirmação!\n\nConvidado confirmado: {confirmed_name}\n")
}

fn compose(sender: &MailSender, subject: &str, confirmed_name: &str) -> Result<Message, NotifyError> {
    Ok(Message::builder()
        .from(sender.username.parse()?)
        .to(sender.recipient.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body(confirmed_name))?)
}

#[cfg(test)]
mod tests {
    use std::{
        net::TcpListener,
        time::{Duration, Instant},
    };

    use super::*;

    fn sender() -> MailSender {
        MailSender {
            username: "organizer@example.com".to_string(),
            password: "secret".to_string(),
            recipient: "organizer@example.com".to_string(),
        }
    }

    /// A port with nothing listening on it.
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    /// Accepts connections and never writes to them.
    async fn silent_relay() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        port
    }

    #[tokio::test]
    async fn notify_without_credentials_is_disabled() {
        let mailer = Mailer::new(MailConfig {
            smtp_host: "unreachable.invalid".to_string(),
            ..MailConfig::default()
        });

        assert!(!mailer.is_enabled());
        assert_eq!(mailer.notify("Artur Mendes").await.unwrap(), Delivery::Disabled);
    }

    #[tokio::test]
    async fn notify_reports_unreachable_relay() {
        let mailer = Mailer::new(MailConfig {
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: closed_port(),
            timeout: Duration::from_secs(2),
            sender: Some(sender()),
            ..MailConfig::default()
        });

        assert!(mailer.notify("Artur Mendes").await.is_err());
    }

    #[tokio::test]
    async fn notify_gives_up_on_a_silent_relay() {
        let mailer = Mailer::new(MailConfig {
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: silent_relay().await,
            timeout: Duration::from_secs(1),
            sender: Some(sender()),
            ..MailConfig::default()
        });

        let started = Instant::now();
        let result = mailer.notify("Artur Mendes").await;
        let elapsed = started.elapsed();

        assert!(result.is_err());
        assert!(elapsed >= Duration::from_millis(900), "returned after {elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "returned after {elapsed:?}");
    }

    #[test]
    fn message_carries_the_confirmed_name() {
        let message = compose(&sender(), "Nova confirmação - Festa 18", "Julia Souza").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: organizer@example.com"));
        assert!(body("Julia Souza").contains("Convidado confirmado: Julia Souza"));
    }

    #[test]
    fn invalid_sender_address_is_rejected() {
        let bad = MailSender {
            username: "not an address".to_string(),
            ..sender()
        };

        assert!(matches!(
            compose(&bad, "subject", "Julia Souza"),
            Err(NotifyError::Address(_))
        ));
    }
}
