//! Contact form relay.
//!
//! A submission goes through two steps:
//!
//! 1. [`screen`] is pure. The form carries a hidden honeypot input
//!    (`masterLenina`) that people never fill in. A truthy value means a bot;
//!    the request is answered with a decoy message and nothing is sent.
//! 2. [`ContactRelay::relay`] does the I/O. The accepted submission is formatted by
//!    [`compose_email`] and handed to a [`Mailer`], which delivers it to the
//!    one fixed recipient.
//!
//! Delivery failures are returned to the caller as-is; there is no retry.
//!
//! User input is HTML-escaped in the email body.

use crate::config::{ConfigError, SiteConfig, SmtpConfig, SmtpTls};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use maud::html;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Body returned to bots that filled the honeypot.
pub const DECOY_MESSAGE: &str = "Boop beep bop zzzzstt good bye";
/// Body returned after a successful relay.
pub const DELIVERED_MESSAGE: &str = "Your message has been delivered. Thanks for contacting! 😀";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mailbox {0:?}: {1}")]
    Address(String, lettre::address::AddressError),
    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Mail config error: {0}")]
    Config(#[from] ConfigError),
}

/// JSON body posted by the contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub email: String,
    pub name: String,
    pub message: String,
    /// Honeypot. Any JSON value; judged by JavaScript truthiness.
    #[serde(rename = "masterLenina", skip_serializing_if = "Option::is_none")]
    pub honeypot: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    Accept,
    /// Honeypot was filled; answer with the decoy and send nothing.
    Reject,
}

/// Decide whether a submission is from a person.
pub fn screen(request: &ContactRequest) -> Screening {
    match &request.honeypot {
        Some(value) if is_truthy(value) => Screening::Reject,
        _ => Screening::Accept,
    }
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// HTML body of the notification email.
pub fn compose_email(request: &ContactRequest) -> String {
    html! {
        div style="padding:20px" {
            h2 { "You have a new contact!" }
            ul style="list-style-type:none" {
                li style="margin-bottom:10px" { "Name: " (request.name) }
                li style="margin-bottom:10px" { "Email: " (request.email) }
                li { "Message: " (request.message) }
            }
        }
    }
    .into_string()
}

/// A fully addressed email ready for a [`Mailer`].
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
}

/// Delivers one email. Implemented over SMTP in production and by stubs in tests.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// SMTP delivery through a pooled `lettre` transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        config.validate_for_sending()?;

        let builder = match config.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpTls::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };
        let mut builder = builder.port(config.port);
        if !config.password.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ));
        }

        tracing::info!(host = %config.host, port = config.port, tls = ?config.tls, "smtp transport ready");
        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(mail.from)
            .to(mail.to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.trim()
        .parse()
        .map_err(|e| MailError::Address(raw.to_string(), e))
}

/// Outcome of one submission, mapped to an HTTP status by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    Delivered,
    Rejected,
}

impl RelayOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Delivered => DELIVERED_MESSAGE,
            Self::Rejected => DECOY_MESSAGE,
        }
    }
}

/// Screens submissions and forwards accepted ones to the fixed recipient.
#[derive(Clone)]
pub struct ContactRelay {
    mailer: Arc<dyn Mailer>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

impl ContactRelay {
    pub fn new(mailer: Arc<dyn Mailer>, from: Mailbox, to: Mailbox, subject: String) -> Self {
        Self {
            mailer,
            from,
            to,
            subject,
        }
    }

    /// Address the relay from site config: sender is `from_name <smtp.user>`,
    /// recipient is `contact.recipient`.
    pub fn from_config(config: &SiteConfig, mailer: Arc<dyn Mailer>) -> Result<Self, MailError> {
        let user = config.smtp.user.trim();
        let address: Address = user
            .parse()
            .map_err(|e| MailError::Address(user.to_string(), e))?;
        let name = config.contact.from_name.trim();
        let from = Mailbox::new((!name.is_empty()).then(|| name.to_string()), address);
        let to = parse_mailbox(&config.contact.recipient)?;
        Ok(Self::new(mailer, from, to, config.contact.subject.clone()))
    }

    pub async fn relay(&self, request: &ContactRequest) -> Result<RelayOutcome, MailError> {
        if screen(request) == Screening::Reject {
            tracing::info!("contact submission rejected by honeypot");
            return Ok(RelayOutcome::Rejected);
        }

        let mail = OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            html: compose_email(request),
        };
        self.mailer.send(mail).await?;
        tracing::info!("contact submission delivered");
        Ok(RelayOutcome::Delivered)
    }
}
