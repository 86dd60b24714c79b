use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccountVerification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub verification_code: String,
    pub expires_at: OffsetDateTime,
}

impl AccountVerification {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
