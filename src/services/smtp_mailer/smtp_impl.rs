use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::Mailbox,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::models::user::User;
use crate::services::smtp_mailer::{confirmation_body, confirmation_subject, Mailer};

use super::MailError;

#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Mailbox,
    frontend_origin: String,
}

impl SmtpMailer {
    pub fn new(frontend_origin: &str) -> Result<Self, anyhow::Error> {
        let host = std::env::var("SMTP_HOST")?;
        let from = std::env::var("SMTP_FROM")?.parse()?;
        let port: u16 = std::env::var("SMTP_PORT")?.parse()?;

        let disabled_tls = std::env::var("SMTP_TLS_DISABLED")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let mailer = if disabled_tls {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host)
                .port(port)
                .build()
        } else {
            let username = std::env::var("SMTP_USERNAME")?;
            let password = std::env::var("SMTP_PASSWORD")?;
            let creds = Credentials::new(username, password);
            let tls = TlsParameters::new(host.clone())?;

            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
                .port(port)
                .tls(Tls::Required(tls))
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport: Arc::new(mailer),
            sender: from,
            frontend_origin: frontend_origin.trim_end_matches('/').to_string(),
        })
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.sender.clone())
            .to(to
                .parse()
                .map_err(|e: AddressError| MailError::InvalidEmailAddress(e.to_string()))?)
            .subject(subject)
            .body(body.to_string())?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| e.into())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_user_confirmation(&self, user: &User, code: &str) -> Result<(), MailError> {
        self.send_email(
            &user.email,
            &confirmation_subject(user),
            &confirmation_body(code),
        )
        .await
    }

    async fn send_reset_email(&self, to: &str, token: &str) -> Result<(), MailError> {
        let path = std::env::var("RESET_PASSWORD_PATH")
            .unwrap_or_else(|_| "/reset-password?token=".to_string());
        let full_url = format!("{}{}{}", self.frontend_origin, path, token);

        let body = format!(
            "You requested to reset your password.\n\nReset here:\n{}\n\nThis link will expire in 30 minutes.",
            full_url
        );

        self.send_email(to, "Reset your password", &body).await
    }
}
