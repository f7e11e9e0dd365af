//! Engagement repository for database operations.
//!
//! Rows are only ever inserted by the accepting transactions in the offer
//! and application repositories; this repository reads and administers them.

use domain::services::visibility::ProposalScope;
use shared::pagination::PageQuery;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EngagementEntity, EngagementStatusDb, OpportunityKindDb};
use crate::metrics::QueryTimer;

const ENGAGEMENT_COLUMNS: &str = "id, opportunity_kind, opportunity_id, student_id, alumnus_id, \
     source_kind, source_id, status, created_at, updated_at";

/// Repository for the engagement ledger.
#[derive(Clone)]
pub struct EngagementRepository {
    pool: PgPool,
}

impl EngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an engagement by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EngagementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_engagement_by_id");
        let result = sqlx::query_as::<_, EngagementEntity>(&format!(
            "SELECT {ENGAGEMENT_COLUMNS} FROM engagements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether an engagement already exists for the pair.
    ///
    /// Advisory pre-check only: the accepting transaction still relies on
    /// the unique constraint, which this check cannot replace under
    /// concurrency.
    pub async fn exists_for_pair(
        &self,
        kind: OpportunityKindDb,
        opportunity_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("engagement_exists_for_pair");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM engagements
                WHERE opportunity_kind = $1 AND opportunity_id = $2 AND student_id = $3
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

    /// List engagements visible to a viewer, newest first.
    pub async fn list(
        &self,
        scope: ProposalScope,
        page: &PageQuery,
    ) -> Result<(Vec<EngagementEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_engagements");

        let filter = match scope {
            ProposalScope::ByStudent(_) => "student_id = $1",
            ProposalScope::ByOwner(_) => "alumnus_id = $1",
        };
        let profile_id = match scope {
            ProposalScope::ByStudent(id) | ProposalScope::ByOwner(id) => id,
        };

        let rows = sqlx::query_as::<_, EngagementEntity>(&format!(
            r#"
            SELECT {ENGAGEMENT_COLUMNS} FROM engagements
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
            "SELECT COUNT(*) FROM engagements WHERE {filter}"
        ))
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok((rows, total))
    }

    /// Administrative transition out of `active` (complete or terminate).
    ///
    /// Returns `None` when the engagement is missing or already closed.
    pub async fn close(
        &self,
        id: Uuid,
        status: EngagementStatusDb,
    ) -> Result<Option<EngagementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("close_engagement");
        let result = sqlx::query_as::<_, EngagementEntity>(&format!(
            r#"
            UPDATE engagements
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
