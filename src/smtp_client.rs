// src/smtp_client.rs
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::models::submission::ContactEntry;

#[derive(Error, Debug)]
pub enum SmtpError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Outbound notification mail. Every send in this service is best-effort:
/// callers spawn the futures and log failures, the HTTP response never
/// waits on delivery.
#[derive(Clone)]
pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    operator: String,
}

impl SmtpClient {
    /// `operator` receives the signup/contact notifications and doubles as
    /// the From address, matching the single-account setup of the service.
    pub fn new(relay: &str, username: String, password: String) -> Result<Self, SmtpError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)?
            .credentials(Credentials::new(username.clone(), password))
            .build();

        Ok(Self {
            transport,
            sender: format!("Nyx AI <{}>", username),
            operator: username,
        })
    }

    pub async fn verify(&self) -> bool {
        match self.transport.test_connection().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!("SMTP connection test failed: {}", e);
                false
            }
        }
    }

    async fn send_html(&self, to: &str, subject: &str, html: String) -> Result<(), SmtpError> {
        let message = Message::builder()
            .from(self.sender.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(message).await?;
        Ok(())
    }

    /// Welcome email to a new waitlist signup, including their position.
    pub async fn send_waitlist_welcome(
        &self,
        email: &str,
        name: &str,
        position: usize,
    ) -> Result<(), SmtpError> {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background: #0a0a0f; color: #e0e0e0; padding: 40px 20px; border-radius: 10px;">
  <h1 style="color: #667eea; text-align: center;">Welcome to Nyx AI!</h1>
  <p>Hi {name}!</p>
  <p>Thanks for joining the waitlist! You're now part of an exclusive group of early adopters who will get first access to our AI-powered tools for students.</p>
  <div style="background: #16213e; padding: 20px; border-radius: 8px; text-align: center;">
    <p style="margin: 0;">Your spot on the waitlist:</p>
    <div style="font-size: 36px; font-weight: bold; color: #667eea;">#{position}</div>
  </div>
  <p style="color: #888; font-size: 12px; text-align: center;">
    You received this because you joined the Nyx AI waitlist.<br>
    If this wasn't you, please ignore this email.
  </p>
</div>"#
        );

        self.send_html(email, "Welcome to the Nyx AI Waitlist!", html)
            .await
    }

    /// Operator notification for a new waitlist signup.
    pub async fn send_waitlist_notification(
        &self,
        email: &str,
        name: &str,
        total: usize,
    ) -> Result<(), SmtpError> {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>New waitlist signup</h1>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Total signups:</strong> {total}</p>
</div>"#
        );

        let operator = self.operator.clone();
        self.send_html(&operator, "NEW WAITLIST SIGNUP", html).await
    }

    /// Operator notification for a contact-form submission.
    pub async fn send_contact_notification(&self, entry: &ContactEntry) -> Result<(), SmtpError> {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>New contact message</h1>
  <p><strong>Name:</strong> {}</p>
  <p><strong>Email:</strong> {}</p>
  <p><strong>Subject:</strong> {}</p>
  <p><strong>Phone:</strong> {}</p>
  <p>{}</p>
</div>"#,
            entry.name,
            entry.email,
            entry.subject.as_deref().unwrap_or("(none)"),
            entry.phone.as_deref().unwrap_or("(none)"),
            entry.message,
        );

        let operator = self.operator.clone();
        self.send_html(&operator, "New contact form message", html)
            .await
    }
}
