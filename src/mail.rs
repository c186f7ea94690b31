//! Outbound email for the verification flow.
//!
//! Delivery is best effort: callers log a [`MailError`] and carry on.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp transport: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, to: &str, link: &str) -> Result<(), MailError>;
}

pub struct VerificationEmail {
    pub subject: &'static str,
    pub text: String,
    pub html: String,
}

impl VerificationEmail {
    pub fn new(link: &str) -> Self {
        Self {
            subject: "Verify your email address",
            text: format!(
                "Thanks for signing up!\n\nConfirm your email address by opening this link:\n{link}\n\nIf you did not create an account, ignore this email."
            ),
            html: format!(
                r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif; color: #333;">
    <h2>Thanks for signing up!</h2>
    <p>Confirm your email address to finish setting up your account.</p>
    <p><a href="{link}" style="background: #2563eb; color: #fff; padding: 10px 18px; border-radius: 6px; text-decoration: none;">Verify email</a></p>
    <p style="color: #888; font-size: 12px;">If you did not create an account, ignore this email.</p>
</body>
</html>"#
            ),
        }
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| MailError::Address(format!("SMTP_FROM: {e}")))?;

        // 465 is implicit TLS, anything else negotiates STARTTLS.
        let mut builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?
        .port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification(&self, to: &str, link: &str) -> Result<(), MailError> {
        let content = VerificationEmail::new(link);
        let to: Mailbox = to.parse().map_err(|e| MailError::Address(format!("{e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(content.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(content.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(content.html),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        debug!("verification email handed to smtp relay");
        Ok(())
    }
}

/// Replaces the value of the `token` query parameter.
fn redact_token(link: &str) -> String {
    match link.find("token=") {
        Some(at) => {
            let value_start = at + "token=".len();
            let rest = &link[value_start..];
            let value_end = rest.find('&').map_or(link.len(), |i| value_start + i);
            format!("{}[redacted]{}", &link[..value_start], &link[value_end..])
        }
        None => link.to_string(),
    }
}

/// Used when no SMTP relay is configured. Logs that a link would have been
/// sent; the token itself is redacted.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, to: &str, link: &str) -> Result<(), MailError> {
        let link = redact_token(link);
        info!(%to, %link, "smtp not configured; verification email not sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::LogCapture;

    #[test]
    fn email_embeds_link_in_both_parts() {
        let link = "https://todo.example.com/verify-email?token=abc123";
        let mail = VerificationEmail::new(link);
        assert!(mail.text.contains(link));
        assert!(mail.html.contains(&format!("href=\"{link}\"")));
    }

    #[test]
    fn smtp_mailer_rejects_bad_sender() {
        let config = SmtpConfig {
            host: "localhost".into(),
            port: 587,
            username: None,
            password: None,
            from: "not an address".into(),
        };
        assert!(matches!(SmtpMailer::new(&config), Err(MailError::Address(_))));
    }

    #[tokio::test]
    async fn smtp_mailer_builds_with_credentials() {
        let config = SmtpConfig {
            host: "localhost".into(),
            port: 587,
            username: Some("user".into()),
            password: Some("pass".into()),
            from: "Todo App <no-reply@example.com>".into(),
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }

    #[test]
    fn redacts_only_the_token_value() {
        assert_eq!(
            redact_token("http://x/verify-email?token=abc123"),
            "http://x/verify-email?token=[redacted]"
        );
        assert_eq!(
            redact_token("http://x/verify-email?token=abc123&lang=en"),
            "http://x/verify-email?token=[redacted]&lang=en"
        );
        assert_eq!(redact_token("http://x/verify-email"), "http://x/verify-email");
    }

    #[tokio::test]
    async fn log_mailer_keeps_token_out_of_logs() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        assert!(LogMailer
            .send_verification("ada@example.com", "http://x/verify-email?token=MAILTOKEN456")
            .await
            .is_ok());

        let output = logs.contents();
        assert!(output.contains("ada@example.com"));
        assert!(output.contains("token=[redacted]"));
        assert!(!output.contains("MAILTOKEN456"));
    }
}
