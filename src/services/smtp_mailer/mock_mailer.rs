use crate::models::user::User;
use crate::services::smtp_mailer::{MailError, Mailer};
use async_trait::async_trait;
use std::sync::Mutex;

/// A mock mailer that records sent emails for testing purposes.
#[derive(Debug, Default)]
pub struct MockMailer {
    pub sent_confirmations: Mutex<Vec<(String, String)>>,
    pub sent_reset_emails: Mutex<Vec<(String, String)>>,
    pub fail_send: bool,
}

impl MockMailer {
    pub fn failing() -> Self {
        Self {
            fail_send: true,
            ..Default::default()
        }
    }

    /// Confirmation mails go out on a spawned task; yield until `count` have
    /// been recorded or give up.
    pub async fn wait_for_confirmations(&self, count: usize) -> Vec<(String, String)> {
        for _ in 0..100 {
            {
                let sent = self.sent_confirmations.lock().unwrap();
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::task::yield_now().await;
        }
        self.sent_confirmations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_user_confirmation(&self, user: &User, code: &str) -> Result<(), MailError> {
        if self.fail_send {
            return Err(MailError::SendError("mock failure".into()));
        }
        self.sent_confirmations
            .lock()
            .unwrap()
            .push((user.email.clone(), code.to_string()));
        Ok(())
    }

    async fn send_reset_email(&self, to: &str, token: &str) -> Result<(), MailError> {
        if self.fail_send {
            return Err(MailError::SendError("mock failure".into()));
        }
        self.sent_reset_emails
            .lock()
            .unwrap()
            .push((to.to_string(), token.to_string()));
        Ok(())
    }
}
