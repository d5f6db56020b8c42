//! Plain-text email delivery via SMTP.
//!
//! Configuration is loaded from environment variables; if `SMTP_HOST` is
//! not set, [`EmailConfig::from_env`] returns `None` and the [`Notifier`]
//! logs each message instead of sending it, which is what local
//! development and tests want.

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "helpdesk@helpdesk.campus.example";

/// SMTP configuration for outbound notifications.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable        | Required | Default                              |
    /// |-----------------|----------|--------------------------------------|
    /// | `SMTP_HOST`     | yes      | --                                   |
    /// | `SMTP_PORT`     | no       | `587`                                |
    /// | `SMTP_FROM`     | no       | `helpdesk@helpdesk.campus.example`   |
    /// | `SMTP_USER`     | no       | --                                   |
    /// | `SMTP_PASSWORD` | no       | --                                   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Sends helpdesk notification emails.
///
/// Without SMTP configuration the notifier runs in log-only mode: every
/// message is emitted as a structured log line and reported as delivered.
pub struct Notifier {
    config: Option<EmailConfig>,
}

impl Notifier {
    /// Build a notifier from the environment, falling back to log-only
    /// mode when `SMTP_HOST` is unset.
    pub fn from_env() -> Self {
        let config = EmailConfig::from_env();
        if config.is_none() {
            tracing::info!("SMTP_HOST not set; notifications will be logged, not emailed");
        }
        Self { config }
    }

    /// A notifier that always logs instead of sending.
    pub fn disabled() -> Self {
        Self { config: None }
    }

    /// Send one plain-text message.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let Some(config) = &self.config else {
            tracing::info!(to, subject, body, "Notification (log-only delivery)");
            return Ok(());
        };

        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to, subject, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
