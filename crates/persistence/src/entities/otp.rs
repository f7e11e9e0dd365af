//! One-time code entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::otp::OneTimeCode;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the one_time_codes table.
#[derive(Debug, Clone, FromRow)]
pub struct OneTimeCodeEntity {
    pub user_id: Uuid,
    pub code: String,
    pub expiry: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OneTimeCodeEntity> for OneTimeCode {
    fn from(entity: OneTimeCodeEntity) -> Self {
        Self {
            user_id: entity.user_id,
            code: entity.code,
            expiry: entity.expiry,
            verified: entity.verified,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
