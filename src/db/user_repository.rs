use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    account_verification::AccountVerification,
    reset_password::{ResetPassword, ResetPasswordUpdate},
    user::{UpdateUserPayload, User},
};

/// Everything needed to persist a freshly signed-up user together with its
/// verification code. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub verification_code: String,
    pub verification_expires_at: OffsetDateTime,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user, its account verification and an empty reset-password
    /// record atomically.
    async fn create_user(&self, new_user: &NewUser) -> Result<User, sqlx::Error>;
    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
    /// Overwrites the stored refresh-token hash and returns what was stored.
    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        hash: Option<&str>,
    ) -> Result<Option<String>, sqlx::Error>;
    /// Marks the account active and verified and drops its verification code.
    async fn activate_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
    async fn update_user_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error>;
    async fn update_reset_password(
        &self,
        user_id: Uuid,
        update: &ResetPasswordUpdate,
    ) -> Result<(), sqlx::Error>;
    /// Consumes an unexpired reset token, stores the new password hash and
    /// clears the refresh-token hash in one step. Returns the owner of the
    /// token, or `None` when the token is unknown, expired or already used.
    async fn complete_password_reset(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<Uuid>, sqlx::Error>;
    async fn update_user_profile(
        &self,
        user_id: Uuid,
        update: &UpdateUserPayload,
    ) -> Result<User, sqlx::Error>;
    /// Removes the user; verification and reset rows go with it.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
    async fn find_account_verification(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AccountVerification>, sqlx::Error>;
    async fn find_reset_password_by_token(
        &self,
        token: &str,
    ) -> Result<Option<ResetPassword>, sqlx::Error>;
}
