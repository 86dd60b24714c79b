use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Mutex;
use std::{error::Error as StdError, fmt};
use time::OffsetDateTime;
use uuid::Uuid;

use super::user_repository::{NewUser, UserRepository};
use crate::models::{
    account_verification::AccountVerification,
    reset_password::{ResetPassword, ResetPasswordUpdate},
    user::{UpdateUserPayload, User},
};

/// In-memory stand-in for Postgres. Mirrors the unique and cascade rules of
/// the real schema closely enough for service and handler tests.
#[derive(Default)]
pub struct MockDb {
    pub users: Mutex<HashMap<Uuid, User>>,
    pub verifications: Mutex<HashMap<Uuid, AccountVerification>>,
    pub reset_passwords: Mutex<HashMap<Uuid, ResetPassword>>,
    pub should_fail: bool,
    /// Email and username lookups report nothing, as if a concurrent signup
    /// landed between the lookup and the insert.
    pub stale_lookups: bool,
}

/// Stand-in for the driver error Postgres returns when a unique index trips.
#[derive(Debug)]
pub struct UniqueViolation {
    constraint: &'static str,
}

impl UniqueViolation {
    pub fn error(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(UniqueViolation { constraint }))
    }
}

impl fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate key value violates unique constraint \"{}\"",
            self.constraint
        )
    }
}

impl StdError for UniqueViolation {}

impl DatabaseError for UniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.constraint)
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

impl MockDb {
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn user(&self, user_id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }

    pub fn set_verification_expiry(&self, user_id: Uuid, expires_at: OffsetDateTime) {
        if let Some(record) = self.verifications.lock().unwrap().get_mut(&user_id) {
            record.expires_at = expires_at;
        }
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.should_fail {
            return Err(sqlx::Error::Protocol("Mock DB failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockDb {
    async fn create_user(&self, new_user: &NewUser) -> Result<User, sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(UniqueViolation::error("users_email_key"));
        }
        if users.values().any(|u| u.username == new_user.username) {
            return Err(UniqueViolation::error("users_username_key"));
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            name: new_user.name.clone(),
            password_hash: new_user.password_hash.clone(),
            is_active: false,
            is_verified_email: false,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        self.verifications.lock().unwrap().insert(
            user.id,
            AccountVerification {
                id: Uuid::new_v4(),
                user_id: user.id,
                verification_code: new_user.verification_code.clone(),
                expires_at: new_user.verification_expires_at,
            },
        );
        self.reset_passwords.lock().unwrap().insert(
            user.id,
            ResetPassword {
                id: Uuid::new_v4(),
                user_id: user.id,
                reset_token: None,
                expires_at: None,
            },
        );

        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        Ok(self.user(user_id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        if self.stale_lookups {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        if self.stale_lookups {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        hash: Option<&str>,
    ) -> Result<Option<String>, sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        user.refresh_token = hash.map(str::to_string);
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.refresh_token.clone())
    }

    async fn activate_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        user.is_active = true;
        user.is_verified_email = true;
        user.updated_at = OffsetDateTime::now_utc();
        self.verifications.lock().unwrap().remove(&user_id);
        Ok(())
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn update_reset_password(
        &self,
        user_id: Uuid,
        update: &ResetPasswordUpdate,
    ) -> Result<(), sqlx::Error> {
        self.check()?;
        let mut resets = self.reset_passwords.lock().unwrap();
        let record = resets.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        record.reset_token = update.reset_token.clone();
        record.expires_at = update.expires_at;
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        self.check()?;
        let now = OffsetDateTime::now_utc();
        let mut users = self.users.lock().unwrap();
        let mut resets = self.reset_passwords.lock().unwrap();

        let Some(record) = resets.values_mut().find(|r| {
            r.reset_token.as_deref() == Some(token) && r.expires_at.is_some_and(|at| at > now)
        }) else {
            return Ok(None);
        };

        let user = users
            .get_mut(&record.user_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        record.reset_token = None;
        record.expires_at = None;
        user.password_hash = password_hash.to_string();
        user.refresh_token = None;
        user.updated_at = now;
        Ok(Some(user.id))
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        update: &UpdateUserPayload,
    ) -> Result<User, sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if let Some(username) = update.username.as_deref() {
            if users
                .values()
                .any(|u| u.id != user_id && u.username == username)
            {
                return Err(UniqueViolation::error("users_username_key"));
            }
        }
        let user = users.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        self.check()?;
        self.users
            .lock()
            .unwrap()
            .remove(&user_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        self.verifications.lock().unwrap().remove(&user_id);
        self.reset_passwords.lock().unwrap().remove(&user_id);
        Ok(())
    }

    async fn find_account_verification(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AccountVerification>, sqlx::Error> {
        self.check()?;
        Ok(self.verifications.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_reset_password_by_token(
        &self,
        token: &str,
    ) -> Result<Option<ResetPassword>, sqlx::Error> {
        self.check()?;
        Ok(self
            .reset_passwords
            .lock()
            .unwrap()
            .values()
            .find(|r| r.reset_token.as_deref() == Some(token))
            .cloned())
    }
}
