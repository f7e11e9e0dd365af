//! Internship repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EngagementTypeDb, InternshipEntity, WorkModeDb};
use crate::metrics::QueryTimer;

const INTERNSHIP_COLUMNS: &str = "id, alumnus_id, title, description, work_mode, engagement_type, \
     location, industry, skills_required, duration_weeks, start_date, end_date, is_paid, \
     stipend_minor, require_resume, require_cover_letter, is_active, is_deleted, deleted_at, \
     created_at, updated_at";

/// Fields for inserting a new internship row.
#[derive(Debug, Clone)]
pub struct NewInternship {
    pub alumnus_id: Uuid,
    pub title: String,
    pub description: String,
    pub work_mode: WorkModeDb,
    pub engagement_type: EngagementTypeDb,
    pub location: String,
    pub industry: String,
    pub skills_required: Vec<String>,
    pub duration_weeks: i32,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub is_paid: bool,
    pub stipend_minor: Option<i64>,
    pub require_resume: bool,
    pub require_cover_letter: bool,
}

/// Repository for internship listings.
#[derive(Clone)]
pub struct InternshipRepository {
    pool: PgPool,
}

impl InternshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an internship.
    pub async fn create(&self, new: NewInternship) -> Result<InternshipEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_internship");
        let result = sqlx::query_as::<_, InternshipEntity>(&format!(
            r#"
            INSERT INTO internships
                (alumnus_id, title, description, work_mode, engagement_type, location,
                 industry, skills_required, duration_weeks, start_date, end_date,
                 is_paid, stipend_minor, require_resume, require_cover_letter)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {INTERNSHIP_COLUMNS}
            "#
        ))
        .bind(new.alumnus_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.work_mode)
        .bind(new.engagement_type)
        .bind(&new.location)
        .bind(&new.industry)
        .bind(&new.skills_required)
        .bind(new.duration_weeks)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.is_paid)
        .bind(new.stipend_minor)
        .bind(new.require_resume)
        .bind(new.require_cover_letter)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a live (non-deleted) internship by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InternshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_internship_by_id");
        let result = sqlx::query_as::<_, InternshipEntity>(&format!(
            "SELECT {INTERNSHIP_COLUMNS} FROM internships WHERE id = $1 AND is_deleted = false"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an alumnus's live internships, newest first.
    pub async fn list_by_owner(
        &self,
        alumnus_id: Uuid,
    ) -> Result<Vec<InternshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_internships_by_owner");
        let result = sqlx::query_as::<_, InternshipEntity>(&format!(
            r#"
            SELECT {INTERNSHIP_COLUMNS}
            FROM internships
            WHERE alumnus_id = $1 AND is_deleted = false
            ORDER BY created_at DESC
            "#
        ))
        .bind(alumnus_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flip the gate for new offers/applications.
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<InternshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_internship_active");
        let result = sqlx::query_as::<_, InternshipEntity>(&format!(
            r#"
            UPDATE internships
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            RETURNING {INTERNSHIP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft-delete: set the tombstone, keep the row for references.
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_internship");
        let result = sqlx::query(
            r#"
            UPDATE internships
            SET is_deleted = true, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
