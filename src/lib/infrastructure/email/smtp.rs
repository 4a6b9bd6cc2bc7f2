//! SMTP email service implementation

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message as LettreMessage, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, MailerError, Message},
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[arg(id = "smtp_host", long = "smtp-host", env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[arg(id = "smtp_port", long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[arg(id = "smtp_user", long = "smtp-user", env = "SMTP_USER")]
    pub username: String,

    /// The SMTP password
    #[arg(id = "smtp_password", long = "smtp-password", env = "SMTP_PASSWORD")]
    pub password: String,

    /// The sender email address
    #[arg(id = "smtp_sender", long = "smtp-sender", env = "SMTP_SENDER")]
    pub sender: String,

    /// Verify the TLS certificate
    #[arg(
        id = "smtp_verify_tls",
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        action = clap::ArgAction::Set,
        default_value_t = true
    )]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[arg(
        id = "smtp_starttls",
        long = "smtp-starttls",
        env = "SMTP_STARTTLS",
        action = clap::ArgAction::Set,
        default_value_t = true
    )]
    pub starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Builds the SMTP transport from the configuration
    pub fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let relay = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
        };

        Ok(relay
            .credentials(creds)
            .port(self.config.port)
            .tls(Tls::Opportunistic(
                TlsParameters::builder(self.config.host.to_string())
                    .dangerous_accept_invalid_certs(!self.config.verify_tls)
                    .build()?,
            ))
            .build())
    }

    /// Builds the MIME message with plain text and HTML alternatives
    pub fn build_message(&self, message: &Message) -> Result<LettreMessage, MailerError> {
        let mut builder = LettreMessage::builder()
            .from(Mailbox::new(
                message.from_name.clone(),
                self.config.sender.parse::<Address>()?,
            ))
            .to(mailbox(message.to_name.clone(), &message.to)?)
            .subject(message.subject.clone());

        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(mailbox(None, reply_to)?);
        }

        Ok(builder.multipart(MultiPart::alternative_plain_html(
            message.plain_body.clone(),
            message.html_body.clone(),
        ))?)
    }
}

fn mailbox(name: Option<String>, address: &EmailAddress) -> Result<Mailbox, MailerError> {
    Ok(Mailbox::new(name, address.as_str().parse::<Address>()?))
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_email(&self, message: &Message) -> Result<(), MailerError> {
        let email = self.build_message(message)?;

        debug!(to = %message.to, subject = %message.subject, "sending email over SMTP");

        match self.transport()?.send(email).await {
            Ok(_) => Ok(()),
            Err(e) => Err(MailerError::UnknownError(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn mailer() -> SMTPMailer {
        SMTPMailer::new(SMTPConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            sender: "notifications@example.com".to_string(),
            ..SMTPConfig::default()
        })
    }

    fn message() -> Message {
        Message {
            to: EmailAddress::new_unchecked("sam@example.com"),
            to_name: Some("Sam".to_string()),
            from_name: Some("Alex Rivera".to_string()),
            reply_to: Some(EmailAddress::new_unchecked("alex@example.com")),
            subject: "Project kickoff".to_string(),
            html_body: "<p>Hello</p>".to_string(),
            plain_body: "Hello".to_string(),
        }
    }

    #[test]
    fn test_build_message_headers() -> TestResult {
        let email = mailer().build_message(&message())?;
        let formatted = String::from_utf8(email.formatted())?;

        assert!(formatted.contains("Alex Rivera"));
        assert!(formatted.contains("<notifications@example.com>"));
        assert!(formatted.contains("To: Sam <sam@example.com>"));
        assert!(formatted.contains("Reply-To: alex@example.com"));
        assert!(formatted.contains("Subject: Project kickoff"));
        assert!(formatted.contains("multipart/alternative"));

        Ok(())
    }

    #[test]
    fn test_build_message_invalid_sender() {
        let mailer = SMTPMailer::new(SMTPConfig {
            sender: "not an address".to_string(),
            ..SMTPConfig::default()
        });

        let result = mailer.build_message(&message());

        assert!(matches!(result, Err(MailerError::InvalidEmail)));
    }

    #[test]
    fn test_build_message_invalid_recipient() {
        let mut message = message();
        message.to = EmailAddress::new_unchecked("nope");

        let result = mailer().build_message(&message);

        assert!(matches!(result, Err(MailerError::InvalidEmail)));
    }
}
