//! Mentorship repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MentorshipEntity;
use crate::metrics::QueryTimer;

const MENTORSHIP_COLUMNS: &str = "id, alumnus_id, title, description, focus_areas, max_slots, \
     remaining_slots, is_active, is_deleted, deleted_at, created_at, updated_at";

/// Fields for updating a mentorship; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct MentorshipChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub focus_areas: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Repository for mentorship listings.
#[derive(Clone)]
pub struct MentorshipRepository {
    pool: PgPool,
}

impl MentorshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a mentorship; remaining slots start at capacity.
    pub async fn create(
        &self,
        alumnus_id: Uuid,
        title: &str,
        description: &str,
        focus_areas: &[String],
        max_slots: i32,
    ) -> Result<MentorshipEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_mentorship");
        let result = sqlx::query_as::<_, MentorshipEntity>(&format!(
            r#"
            INSERT INTO mentorships (alumnus_id, title, description, focus_areas, max_slots, remaining_slots)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {MENTORSHIP_COLUMNS}
            "#
        ))
        .bind(alumnus_id)
        .bind(title)
        .bind(description)
        .bind(focus_areas)
        .bind(max_slots)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a live (non-deleted) mentorship by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MentorshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_mentorship_by_id");
        let result = sqlx::query_as::<_, MentorshipEntity>(&format!(
            "SELECT {MENTORSHIP_COLUMNS} FROM mentorships WHERE id = $1 AND is_deleted = false"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an alumnus's live mentorships, newest first.
    pub async fn list_by_owner(
        &self,
        alumnus_id: Uuid,
    ) -> Result<Vec<MentorshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_mentorships_by_owner");
        let result = sqlx::query_as::<_, MentorshipEntity>(&format!(
            r#"
            SELECT {MENTORSHIP_COLUMNS}
            FROM mentorships
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

    /// Apply partial updates to a live mentorship.
    pub async fn update(
        &self,
        id: Uuid,
        changes: MentorshipChanges,
    ) -> Result<Option<MentorshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_mentorship");
        let result = sqlx::query_as::<_, MentorshipEntity>(&format!(
            r#"
            UPDATE mentorships
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                focus_areas = COALESCE($4, focus_areas),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            RETURNING {MENTORSHIP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.focus_areas)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft-delete: set the tombstone, keep the row for references.
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_mentorship");
        let result = sqlx::query(
            r#"
            UPDATE mentorships
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
