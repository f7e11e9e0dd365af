//! Offer repository for database operations.
//!
//! Accepting an offer is one transaction: the conditional status flip, the
//! engagement insert and (for mentorships) the slot decrement either all
//! commit or none do.

use domain::services::visibility::ProposalScope;
use shared::pagination::PageQuery;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EngagementEntity, OfferEntity, OpportunityKindDb, ProposalStatusDb};
use crate::metrics::QueryTimer;
use crate::repositories::{is_unique_violation, RespondError, ENGAGEMENT_PAIR_CONSTRAINT};

const OFFER_COLUMNS: &str = "id, opportunity_kind, opportunity_id, student_id, status, \
     responded_at, created_at, updated_at";

const ENGAGEMENT_COLUMNS: &str = "id, opportunity_kind, opportunity_id, student_id, alumnus_id, \
     source_kind, source_id, status, created_at, updated_at";

/// Repository for offers (owner-to-student proposals).
#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending offer.
    ///
    /// The partial unique index on pending pairs turns a duplicate into a
    /// 23505, which the API layer reports as `duplicate`.
    pub async fn create(
        &self,
        kind: OpportunityKindDb,
        opportunity_id: Uuid,
        student_id: Uuid,
    ) -> Result<OfferEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_offer");
        let result = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            INSERT INTO offers (opportunity_kind, opportunity_id, student_id)
            VALUES ($1, $2, $3)
            RETURNING {OFFER_COLUMNS}
            "#
        ))
        .bind(kind)
        .bind(opportunity_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an offer by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_offer_by_id");
        let result = sqlx::query_as::<_, OfferEntity>(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a pending offer already exists for this pair.
    pub async fn pending_exists(
        &self,
        kind: OpportunityKindDb,
        opportunity_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("offer_pending_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM offers
                WHERE opportunity_kind = $1 AND opportunity_id = $2
                  AND student_id = $3 AND status = 'pending'
            )
            "#,
        )
        .bind(kind)
        .bind(opportunity_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List offers visible to a viewer, newest first.
    pub async fn list(
        &self,
        scope: ProposalScope,
        page: &PageQuery,
    ) -> Result<(Vec<OfferEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_offers");

        let filter = match scope {
            ProposalScope::ByStudent(_) => "student_id = $1",
            ProposalScope::ByOwner(_) => {
                "((opportunity_kind = 'mentorship' AND opportunity_id IN
                      (SELECT id FROM mentorships WHERE alumnus_id = $1))
                  OR (opportunity_kind = 'internship' AND opportunity_id IN
                      (SELECT id FROM internships WHERE alumnus_id = $1)))"
            }
        };
        let profile_id = match scope {
            ProposalScope::ByStudent(id) | ProposalScope::ByOwner(id) => id,
        };

        let rows = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            SELECT {OFFER_COLUMNS} FROM offers
            WHERE {filter}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(profile_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM offers WHERE {filter}"
        ))
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok((rows, total))
    }

    /// Accept a pending offer, creating the engagement in the same
    /// transaction.
    ///
    /// Failure modes map to the loser of each race: a concurrent responder
    /// (`AlreadyResolved`), a concurrent engagement for the pair
    /// (`AlreadyEngaged`), an exhausted mentorship (`NoSlotsRemaining`).
    pub async fn accept(
        &self,
        offer: &OfferEntity,
        alumnus_id: Uuid,
    ) -> Result<(OfferEntity, EngagementEntity), RespondError> {
        let timer = QueryTimer::new("accept_offer");
        let mut tx = self.pool.begin().await.map_err(RespondError::Db)?;

        let accepted = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            UPDATE offers
            SET status = 'accepted', responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {OFFER_COLUMNS}
            "#
        ))
        .bind(offer.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RespondError::Db)?
        .ok_or(RespondError::AlreadyResolved)?;

        let engagement = sqlx::query_as::<_, EngagementEntity>(&format!(
            r#"
            INSERT INTO engagements
                (opportunity_kind, opportunity_id, student_id, alumnus_id, source_kind, source_id)
            VALUES ($1, $2, $3, $4, 'offer', $5)
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(offer.opportunity_kind)
        .bind(offer.opportunity_id)
        .bind(offer.student_id)
        .bind(alumnus_id)
        .bind(offer.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, ENGAGEMENT_PAIR_CONSTRAINT) {
                RespondError::AlreadyEngaged
            } else {
                RespondError::Db(e)
            }
        })?;

        if offer.opportunity_kind == OpportunityKindDb::Mentorship {
            let decremented = sqlx::query(
                r#"
                UPDATE mentorships
                SET remaining_slots = remaining_slots - 1, updated_at = NOW()
                WHERE id = $1 AND remaining_slots > 0
                "#,
            )
            .bind(offer.opportunity_id)
            .execute(&mut *tx)
            .await
            .map_err(RespondError::Db)?;

            if decremented.rows_affected() == 0 {
                return Err(RespondError::NoSlotsRemaining);
            }
        }

        tx.commit().await.map_err(RespondError::Db)?;
        timer.record();
        Ok((accepted, engagement))
    }

    /// Flip a pending offer to `rejected` or `withdrawn`.
    pub async fn resolve(
        &self,
        id: Uuid,
        status: ProposalStatusDb,
    ) -> Result<OfferEntity, RespondError> {
        let timer = QueryTimer::new("resolve_offer");
        let result = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            UPDATE offers
            SET status = $2, responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {OFFER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(RespondError::Db)?
        .ok_or(RespondError::AlreadyResolved);
        timer.record();
        result
    }
}
