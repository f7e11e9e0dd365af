//! One-time code repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::OneTimeCodeEntity;
use crate::metrics::QueryTimer;

/// Repository for one-time verification codes.
#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issue a code for a user: update-or-create semantics.
    ///
    /// An outstanding unconsumed code is superseded the moment a new one is
    /// issued; the verified flag resets alongside.
    pub async fn issue(
        &self,
        user_id: Uuid,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> Result<OneTimeCodeEntity, sqlx::Error> {
        let timer = QueryTimer::new("issue_otp");
        let result = sqlx::query_as::<_, OneTimeCodeEntity>(
            r#"
            INSERT INTO one_time_codes (user_id, code, expiry, verified)
            VALUES ($1, $2, $3, false)
            ON CONFLICT (user_id) DO UPDATE
                SET code = EXCLUDED.code,
                    expiry = EXCLUDED.expiry,
                    verified = false,
                    updated_at = NOW()
            RETURNING user_id, code, expiry, verified, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expiry)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the code owned by a user.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<OneTimeCodeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_otp_by_user");
        let result = sqlx::query_as::<_, OneTimeCodeEntity>(
            r#"
            SELECT user_id, code, expiry, verified, created_at, updated_at
            FROM one_time_codes
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Consume a verified code and activate its user in one transaction.
    ///
    /// The conditional flip on `verified = false` makes a concurrent second
    /// verification lose with zero rows, which callers report as
    /// already-used.
    pub async fn consume_and_activate(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("consume_otp_and_activate");
        let mut tx = self.pool.begin().await?;

        let consumed = sqlx::query(
            r#"
            UPDATE one_time_codes
            SET verified = true, updated_at = NOW()
            WHERE user_id = $1 AND verified = false
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if consumed.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET is_active = true, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(true)
    }
}
