//! # Outbound Mail
//!
//! Composing and sending the transactional email behind the contact form.
//!
//! [`compose`] is a pure transform from a sanitized submission to a
//! [`ComposedMessage`]; delivery goes through the [`Mailer`] trait so the
//! endpoint never talks to SMTP directly. The production [`SmtpMailer`]
//! relays through Gmail with the account credentials from [`Config`].
//!
//! One attempt per request. A failed send is reported to the caller, not
//! retried.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{config::Config, validate::ContactSubmission};

const SMTP_RELAY: &str = "smtp.gmail.com";

/// A fully rendered transactional email, ready for a transport.
///
/// `reply_to` carries the submitter's address as an envelope header only;
/// it is never interpolated into the HTML beyond the escaped copy already
/// inside the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub reply_to: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Build the collaboration-request email for a sanitized submission.
///
/// The site owner's account is both sender and recipient; replying goes to
/// the submitter via `reply_to`.
pub fn compose(submission: &ContactSubmission, account: &str) -> ComposedMessage {
    ComposedMessage {
        from: account.to_string(),
        to: account.to_string(),
        subject: format!(
            "New Collaboration Request from {} - Sachiva",
            submission.name
        ),
        html_body: format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #ddd; border-radius: 10px;">
  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #ff6b35; margin: 0;">Sachiva</h1>
    <h2 style="color: #333; margin: 10px 0;">New Collaboration Request</h2>
  </div>
  <div style="background-color: #f9f9f9; padding: 20px; border-radius: 8px; margin-bottom: 20px;">
    <h3 style="color: #333; margin-top: 0;">Contact Information</h3>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
  </div>
  <div style="background-color: #fff3cd; padding: 20px; border-radius: 8px; margin-bottom: 20px;">
    <h3 style="color: #333; margin-top: 0;">Message</h3>
    <p style="white-space: pre-wrap; line-height: 1.6;">{message}</p>
  </div>
  <div style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd;">
    <p style="color: #666; font-size: 14px;">
      This email was sent from the Sachiva contact form.<br>
      Reply directly to this email to respond to {name}.
    </p>
  </div>
</div>"#,
            name = submission.name,
            email = submission.email,
            message = submission.message,
        ),
        reply_to: submission.email.clone(),
    }
}

/// Delivery seam between the contact endpoint and the mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &ComposedMessage) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_RELAY)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .credentials(Credentials::new(
                config.mail_user.clone(),
                config.mail_password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }

    /// Probe the SMTP connection at startup. Failure is logged, not fatal;
    /// the first real send will surface it to a caller.
    pub async fn verify(&self) {
        match self.transport.test_connection().await {
            Ok(true) => info!("SMTP server is ready to send emails"),
            Ok(false) => warn!("SMTP connection could not be verified"),
            Err(e) => warn!("SMTP connection error: {e}"),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &ComposedMessage) -> Result<(), MailError> {
        let email = Message::builder()
            .from(parse_mailbox(&message.from)?)
            .to(parse_mailbox(&message.to)?)
            .reply_to(parse_mailbox(&message.reply_to)?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map(drop)
            .map_err(|e| MailError::Smtp(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}
