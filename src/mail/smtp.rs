//! SMTP mail transport using lettre.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, error, info};

use super::Mailer;
use crate::config::SmtpConfig;
use crate::errors::{NotificationError, NotificationResult};
use crate::templates::OutgoingEmail;

/// Delivers plain-text emails through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl SmtpMailer {
    /// Build a mailer for the relay described by `config`.
    ///
    /// No connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> NotificationResult<Self> {
        let transport = Self::build_transport(config)?;
        Ok(Self {
            transport,
            host: config.host.clone(),
            port: config.port,
        })
    }

    fn build_transport(config: &SmtpConfig) -> NotificationResult<AsyncSmtpTransport<Tokio1Executor>> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| {
                    NotificationError::MailError(format!("failed to create SMTP relay: {e}"))
                })?
                .port(config.port)
        } else {
            // Plain connection for local relays such as Mailpit
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port)
        };

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(builder.build())
    }

    /// Convert an [`OutgoingEmail`] into a lettre message.
    pub fn build_message(email: &OutgoingEmail) -> NotificationResult<Message> {
        let from: Mailbox = email.from_address.parse().map_err(|e| {
            NotificationError::InvalidAddress(format!("from '{}': {e}", email.from_address))
        })?;

        let mut builder = Message::builder().from(from).subject(&email.subject);

        for to in &email.to {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|e| NotificationError::InvalidAddress(format!("to '{to}': {e}")))?;
            builder = builder.to(mailbox);
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| NotificationError::MailError(format!("failed to build email message: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> NotificationResult<()> {
        debug!(
            to = ?email.to,
            subject = %email.subject,
            host = %self.host,
            port = self.port,
            "Sending email via SMTP"
        );

        let message = Self::build_message(email)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!(to = ?email.to, error = %e, "Failed to send email via SMTP");
            NotificationError::from(e)
        })?;

        let message_id = response.message().next().map(|s| s.to_string());
        info!(to = ?email.to, message_id = ?message_id, "Email accepted by SMTP relay");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
