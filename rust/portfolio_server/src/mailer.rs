// src/mailer.rs

use crate::config::MailSettings;
use crate::contact::ContactMessage;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Builds the owner-to-owner message with the visitor as Reply-To.
pub fn compose(owner: &Mailbox, message: &ContactMessage) -> Result<Message, MailError> {
    let reply_to: Mailbox = message.reply_to.parse()?;
    let email = Message::builder()
        .from(owner.clone())
        .to(owner.clone())
        .reply_to(reply_to)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())?;
    Ok(email)
}

/// Submits over implicit TLS with the owner's credentials.
pub struct SmtpMailer {
    owner: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let owner: Mailbox = settings.owner.parse()?;
        let credentials = Credentials::new(
            settings.owner.clone(),
            settings.password.expose_secret().to_string(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(SmtpMailer { owner, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let email = compose(&self.owner, message)?;
        self.transport.send(email).await?;
        info!(subject = %message.subject, "contact message delivered");
        Ok(())
    }
}
