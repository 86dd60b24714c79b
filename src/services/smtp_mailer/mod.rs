use async_trait::async_trait;
use std::fmt;

use lettre::transport::smtp::Error as SmtpError;

use crate::models::user::User;

#[derive(Debug)]
pub enum MailError {
    InvalidEmailAddress(String),
    SendError(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::InvalidEmailAddress(e) => write!(f, "Invalid Address: {}", e),
            MailError::SendError(e) => write!(f, "Send error: {}", e),
        }
    }
}

impl std::error::Error for MailError {}

impl From<SmtpError> for MailError {
    fn from(err: SmtpError) -> Self {
        MailError::SendError(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::SendError(err.to_string())
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Welcome mail carrying the signup verification code.
    async fn send_user_confirmation(&self, user: &User, code: &str) -> Result<(), MailError>;
    async fn send_reset_email(&self, to: &str, token: &str) -> Result<(), MailError>;
}

pub fn confirmation_subject(user: &User) -> String {
    format!("Hello {}, Welcome to my blog", user.username)
}

pub fn confirmation_body(code: &str) -> String {
    format!("Thanks for signing up!\n\nYour verification code is: {}", code)
}

#[cfg(test)]
mod mock_mailer;
mod smtp_impl;

#[cfg(test)]
pub use mock_mailer::MockMailer;
pub use smtp_impl::SmtpMailer;
