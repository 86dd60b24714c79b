use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResetPassword {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reset_token: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
}

/// New values for a user's reset record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetPasswordUpdate {
    pub reset_token: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
}
