//! Application repository for database operations.
//!
//! Mirrors the offer repository with the proposal direction reversed; the
//! accepting transaction is the same shape.

use domain::services::visibility::ProposalScope;
use shared::pagination::PageQuery;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    ApplicationEntity, EngagementEntity, OpportunityKindDb, ProposalStatusDb,
};
use crate::metrics::QueryTimer;
use crate::repositories::{is_unique_violation, RespondError, ENGAGEMENT_PAIR_CONSTRAINT};

const APPLICATION_COLUMNS: &str = "id, opportunity_kind, opportunity_id, student_id, resume_url, \
     cover_letter, status, responded_at, created_at, updated_at";

const ENGAGEMENT_COLUMNS: &str = "id, opportunity_kind, opportunity_id, student_id, alumnus_id, \
     source_kind, source_id, status, created_at, updated_at";

/// Repository for applications (student-to-opportunity proposals).
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending application.
    pub async fn create(
        &self,
        kind: OpportunityKindDb,
        opportunity_id: Uuid,
        student_id: Uuid,
        resume_url: Option<&str>,
        cover_letter: Option<&str>,
    ) -> Result<ApplicationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_application");
        let result = sqlx::query_as::<_, ApplicationEntity>(&format!(
            r#"
            INSERT INTO applications
                (opportunity_kind, opportunity_id, student_id, resume_url, cover_letter)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(kind)
        .bind(opportunity_id)
        .bind(student_id)
        .bind(resume_url)
        .bind(cover_letter)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an application by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_by_id");
        let result = sqlx::query_as::<_, ApplicationEntity>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a pending application already exists for this pair.
    pub async fn pending_exists(
        &self,
        kind: OpportunityKindDb,
        opportunity_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("application_pending_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM applications
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

    /// List applications visible to a viewer, newest first.
    pub async fn list(
        &self,
        scope: ProposalScope,
        page: &PageQuery,
    ) -> Result<(Vec<ApplicationEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_applications");

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

        let rows = sqlx::query_as::<_, ApplicationEntity>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS} FROM applications
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
            "SELECT COUNT(*) FROM applications WHERE {filter}"
        ))
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok((rows, total))
    }

    /// Accept a pending application, creating the engagement in the same
    /// transaction.
    pub async fn accept(
        &self,
        application: &ApplicationEntity,
        alumnus_id: Uuid,
    ) -> Result<(ApplicationEntity, EngagementEntity), RespondError> {
        let timer = QueryTimer::new("accept_application");
        let mut tx = self.pool.begin().await.map_err(RespondError::Db)?;

        let accepted = sqlx::query_as::<_, ApplicationEntity>(&format!(
            r#"
            UPDATE applications
            SET status = 'accepted', responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(application.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RespondError::Db)?
        .ok_or(RespondError::AlreadyResolved)?;

        let engagement = sqlx::query_as::<_, EngagementEntity>(&format!(
            r#"
            INSERT INTO engagements
                (opportunity_kind, opportunity_id, student_id, alumnus_id, source_kind, source_id)
            VALUES ($1, $2, $3, $4, 'application', $5)
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(application.opportunity_kind)
        .bind(application.opportunity_id)
        .bind(application.student_id)
        .bind(alumnus_id)
        .bind(application.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, ENGAGEMENT_PAIR_CONSTRAINT) {
                RespondError::AlreadyEngaged
            } else {
                RespondError::Db(e)
            }
        })?;

        if application.opportunity_kind == OpportunityKindDb::Mentorship {
            let decremented = sqlx::query(
                r#"
                UPDATE mentorships
                SET remaining_slots = remaining_slots - 1, updated_at = NOW()
                WHERE id = $1 AND remaining_slots > 0
                "#,
            )
            .bind(application.opportunity_id)
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

    /// Flip a pending application to `rejected` or `withdrawn`.
    pub async fn resolve(
        &self,
        id: Uuid,
        status: ProposalStatusDb,
    ) -> Result<ApplicationEntity, RespondError> {
        let timer = QueryTimer::new("resolve_application");
        let result = sqlx::query_as::<_, ApplicationEntity>(&format!(
            r#"
            UPDATE applications
            SET status = $2, responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {APPLICATION_COLUMNS}
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
