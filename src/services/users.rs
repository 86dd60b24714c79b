use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::user_repository::{NewUser, UserRepository},
    models::{
        account_verification::AccountVerification,
        reset_password::{ResetPassword, ResetPasswordUpdate},
        signup::SignupPayload,
        user::{UpdateUserPayload, User},
    },
    services::{errors::UserServiceError, smtp_mailer::Mailer},
    utils::{
        codes::{expires_in_hours, generate_verification_code},
        password::hash_password,
    },
};

/// User records, verification codes and account activation.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    verification_ttl_hours: i64,
}

/// Constraint name of a unique-index violation, empty when the driver
/// does not report one. `None` for every other error.
fn violated_unique_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        verification_ttl_hours: i64,
    ) -> Self {
        Self {
            repo,
            mailer,
            verification_ttl_hours,
        }
    }

    /// Persists a new, inactive user and queues the confirmation mail.
    ///
    /// The returned record still carries the password hash; redaction is up
    /// to the caller. The mail is sent from a detached task and its outcome
    /// is only logged.
    pub async fn create(&self, payload: SignupPayload) -> Result<User, UserServiceError> {
        if self.repo.find_user_by_email(&payload.email).await?.is_some() {
            return Err(UserServiceError::Conflict(payload.email));
        }
        if self
            .repo
            .find_user_by_username(&payload.username)
            .await?
            .is_some()
        {
            return Err(UserServiceError::Conflict(payload.username));
        }

        let verification_code = generate_verification_code();
        let new_user = NewUser {
            password_hash: hash_password(&payload.password)?,
            email: payload.email,
            username: payload.username,
            name: payload.name,
            verification_code: verification_code.clone(),
            verification_expires_at: expires_in_hours(self.verification_ttl_hours),
        };

        let user = self
            .repo
            .create_user(&new_user)
            .await
            .map_err(|err| match violated_unique_constraint(&err) {
                Some(constraint) if constraint.contains("email") => {
                    UserServiceError::Conflict(new_user.email.clone())
                }
                Some(_) => UserServiceError::Conflict(new_user.username.clone()),
                None => err.into(),
            })?;

        tracing::info!(user_id = %user.id, "user created");

        let mailer = Arc::clone(&self.mailer);
        let recipient = user.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer
                .send_user_confirmation(&recipient, &verification_code)
                .await
            {
                tracing::error!(%err, user_id = %recipient.id, "failed to send confirmation email");
            }
        });

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repo.find_user_by_username(username).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repo.find_user_by_email(email).await?)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserServiceError> {
        Ok(self.repo.find_user_by_id(user_id).await?)
    }

    /// Stores the hash of the latest refresh token; `None` clears it.
    pub async fn update_hash_refresh_token(
        &self,
        user_id: Uuid,
        hash: Option<&str>,
    ) -> Result<Option<String>, UserServiceError> {
        Ok(self.repo.update_refresh_token(user_id, hash).await?)
    }

    /// Caller must have checked the verification code and its expiry.
    pub async fn active_account(&self, user_id: Uuid) -> Result<(), UserServiceError> {
        self.repo.activate_user(user_id).await?;
        tracing::info!(%user_id, "account activated");
        Ok(())
    }

    pub async fn update_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), UserServiceError> {
        let password_hash = hash_password(new_password)?;
        self.repo
            .update_user_password(user_id, &password_hash)
            .await?;
        Ok(())
    }

    pub async fn update_reset_password(
        &self,
        user_id: Uuid,
        update: ResetPasswordUpdate,
    ) -> Result<(), UserServiceError> {
        self.repo.update_reset_password(user_id, &update).await?;
        Ok(())
    }

    /// Hashes `new_password` and applies it through the single-use `token`.
    /// `None` means the token was unknown, expired or already consumed.
    pub async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Option<Uuid>, UserServiceError> {
        let password_hash = hash_password(new_password)?;
        Ok(self
            .repo
            .complete_password_reset(token, &password_hash)
            .await?)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, UserServiceError> {
        if let Some(username) = payload.username.as_deref() {
            if let Some(existing) = self.repo.find_user_by_username(username).await? {
                if existing.id != user_id {
                    return Err(UserServiceError::Conflict(username.to_string()));
                }
            }
        }

        if payload.is_empty() {
            return self
                .repo
                .find_user_by_id(user_id)
                .await?
                .ok_or(UserServiceError::NotFound);
        }

        self.repo
            .update_user_profile(user_id, &payload)
            .await
            .map_err(|err| {
                match (&payload.username, violated_unique_constraint(&err)) {
                    (Some(username), Some(_)) => UserServiceError::Conflict(username.clone()),
                    _ => err.into(),
                }
            })
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<(), UserServiceError> {
        self.repo.delete_user(user_id).await?;
        tracing::info!(%user_id, "user deleted");
        Ok(())
    }

    pub async fn find_account_verification(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AccountVerification>, UserServiceError> {
        Ok(self.repo.find_account_verification(user_id).await?)
    }

    pub async fn find_reset_password_by_token(
        &self,
        token: &str,
    ) -> Result<Option<ResetPassword>, UserServiceError> {
        Ok(self.repo.find_reset_password_by_token(token).await?)
    }
}
