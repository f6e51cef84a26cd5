//! SMTP email provider implementation using Lettre.

use crate::error::{Error, Result};
use crate::providers::EmailProvider;
use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};

/// SMTP connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server address (e.g. "smtp.gmail.com").
    pub server: String,

    /// SMTP server port (usually 587 for TLS, 465 for SSL).
    pub port: u16,

    /// SMTP authentication username.
    pub username: String,

    /// SMTP authentication password.
    pub password: String,

    /// Sender email address.
    pub from_email: String,

    /// Sender display name.
    pub from_name: String,

    /// Public base URL of the app, linked from email bodies.
    pub base_url: String,
}

/// SMTP email provider using Lettre.
///
/// Sends real email; used by the server binary. Message delivery runs on a
/// blocking thread so the async runtime is never stalled by SMTP I/O.
#[derive(Clone)]
pub struct SmtpEmailProvider {
    server: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
    base_url: String,
}

impl SmtpEmailProvider {
    /// Create a new SMTP email provider.
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        let credentials = Credentials::new(config.username, config.password);

        Self {
            server: config.server,
            port: config.port,
            credentials,
            from_email: config.from_email,
            from_name: config.from_name,
            base_url: config.base_url,
        }
    }

    /// Build SMTP transport for sending emails.
    ///
    /// Creates a new transport for each email to avoid connection pooling
    /// issues.
    ///
    /// # Errors
    ///
    /// Returns error if SMTP connection fails.
    fn build_transport(&self) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.server)
            .map_err(|e| Error::EmailError(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();
        Ok(transport)
    }

    /// Build the "From" header.
    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Assemble and deliver one message.
    async fn deliver(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| Error::EmailError(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| Error::EmailError(format!("Invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| Error::EmailError(format!("Failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| Error::EmailError(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| Error::EmailError(format!("Email task failed: {e}")))?
        .map(|_| ())
    }
}

impl EmailProvider for SmtpEmailProvider {
    async fn send_invitation(
        &self,
        to: &str,
        inviter_username: &str,
        event_address: &str,
        event_date: DateTime<Utc>,
    ) -> Result<()> {
        let date = event_date.format("%A, %B %-d at %H:%M UTC");
        let base_url = &self.base_url;

        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>You're invited</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">You're invited to play</h2>
        <p><strong>{inviter_username}</strong> invited you to an event at
        <strong>{event_address}</strong> on {date}.</p>
        <p><a href="{base_url}">Sign in to Courtside</a> to join.</p>
        <p style="color: #666; font-size: 14px;">
            If you don't know this person, you can safely ignore this email.
        </p>
    </div>
</body>
</html>
            "#
        );

        self.deliver(to, "You're invited to a pickleball event", html_body)
            .await
    }

    async fn send_password_reset(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let expires_minutes = (expires_at - Utc::now()).num_minutes();
        let base_url = &self.base_url;

        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Reset your password</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #dc2626;">Reset your password</h2>
        <p>Enter the code below at <a href="{base_url}">{base_url}</a> to reset
        your password. It expires in {expires_minutes} minutes.</p>
        <p style="margin: 30px 0; font-size: 24px; font-family: monospace; letter-spacing: 2px;">
            {code}
        </p>
        <p style="color: #666; font-size: 14px;">
            If you didn't request this password reset, please ignore this email.
            Your password will not be changed.
        </p>
    </div>
</body>
</html>
            "#
        );

        self.deliver(to, "Reset your password", html_body).await
    }
}
