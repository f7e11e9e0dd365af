//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AlumniProfileEntity, StudentProfileEntity};
use crate::metrics::QueryTimer;

const STUDENT_COLUMNS: &str = "id, user_id, description, matric_no, department, faculty, level, \
     cgpa, skills, expected_grad_year, resume_url, linkedin_url, github_url, created_at";

const ALUMNI_COLUMNS: &str = "id, user_id, description, matric_no, department, faculty, \
     grad_year, current_job_title, current_company, industry, years_of_exp, \
     linkedin_url, github_url, created_at";

/// Repository for role-specific profile lookups.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the student profile owned by a user.
    pub async fn find_student_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StudentProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_student_profile_by_user");
        let result = sqlx::query_as::<_, StudentProfileEntity>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a student profile by its own id.
    pub async fn find_student_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<StudentProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_student_profile_by_id");
        let result = sqlx::query_as::<_, StudentProfileEntity>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the alumni profile owned by a user.
    pub async fn find_alumnus_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AlumniProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_alumni_profile_by_user");
        let result = sqlx::query_as::<_, AlumniProfileEntity>(&format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
