//! SMTP email service using the `lettre` crate.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use pagecraft_application::EmailService;
use pagecraft_core::{AppError, AppResult};
use tracing::info;

/// SMTP email service configuration.
#[derive(Clone)]
pub struct SmtpEmailConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password.
    pub password: String,
    /// Sender email address.
    pub from_address: String,
}

/// Lead notification email sent through an SMTP relay.
#[derive(Clone)]
pub struct SmtpEmailService {
    config: SmtpEmailConfig,
    from: Mailbox,
}

impl SmtpEmailService {
    /// Creates a new SMTP email service.
    pub fn new(config: SmtpEmailConfig) -> AppResult<Self> {
        let from = config.from_address.parse().map_err(|error| {
            AppError::Configuration(format!(
                "invalid sender address '{}': {error}",
                config.from_address
            ))
        })?;

        Ok(Self { config, from })
    }

    fn build_message(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<Message> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|error| AppError::Validation(format!("invalid recipient address: {error}")))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject);

        let message = match html_body {
            Some(html_body) => builder.multipart(MultiPart::alternative_plain_html(
                text_body.to_owned(),
                html_body.to_owned(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text_body.to_owned()),
        };

        message.map_err(|error| AppError::Internal(format!("failed to build email: {error}")))
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        let message = self.build_message(to, subject, text_body, html_body)?;

        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|error| {
                AppError::Internal(format!("failed to create SMTP transport: {error}"))
            })?
            .port(self.config.port)
            .credentials(credentials)
            .build();

        mailer
            .send(message)
            .await
            .map_err(|error| AppError::Internal(format!("failed to send email: {error}")))?;
        info!(to, subject, "lead email sent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_core::AppError;

    use super::{SmtpEmailConfig, SmtpEmailService};

    fn config(from_address: &str) -> SmtpEmailConfig {
        SmtpEmailConfig {
            host: "smtp.example.com".to_owned(),
            port: 587,
            username: "mailer".to_owned(),
            password: "secret".to_owned(),
            from_address: from_address.to_owned(),
        }
    }

    #[test]
    fn sender_address_is_checked_up_front() {
        assert!(SmtpEmailService::new(config("Pagecraft <leads@example.com>")).is_ok());
        assert!(matches!(
            SmtpEmailService::new(config("not-an-address")),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn html_bodies_become_multipart_alternatives() {
        let service = SmtpEmailService::new(config("leads@example.com"))
            .unwrap_or_else(|_| unreachable!());

        let plain = service.build_message("agent@example.com", "New lead", "body", None);
        assert!(plain.is_ok());

        let rich = service
            .build_message("agent@example.com", "New lead", "body", Some("<p>body</p>"))
            .map(|message| String::from_utf8_lossy(&message.formatted()).into_owned())
            .unwrap_or_default();
        assert!(rich.contains("multipart/alternative"));

        assert!(matches!(
            service.build_message("nobody", "New lead", "body", None),
            Err(AppError::Validation(_))
        ));
    }
}
