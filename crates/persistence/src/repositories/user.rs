//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AlumniProfileEntity, StudentProfileEntity, UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, email, password_hash, phone_num, role, firstname, lastname, \
     middlename, street, city, state, country, is_active, created_at, updated_at";

/// Fields for inserting a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub phone_num: String,
    pub role: UserRoleDb,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Fields for inserting a student profile row.
#[derive(Debug, Clone)]
pub struct NewStudentProfile {
    pub description: Option<String>,
    pub matric_no: String,
    pub department: String,
    pub faculty: String,
    pub level: i32,
    pub cgpa: f64,
    pub skills: Vec<String>,
    pub expected_grad_year: i32,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

/// Fields for inserting an alumni profile row.
#[derive(Debug, Clone)]
pub struct NewAlumniProfile {
    pub description: Option<String>,
    pub matric_no: String,
    pub department: String,
    pub faculty: String,
    pub grad_year: i32,
    pub current_job_title: String,
    pub current_company: String,
    pub industry: String,
    pub years_of_exp: i32,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a stale inactive account so its email can sign up again.
    pub async fn delete_inactive_by_email(&self, email: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_inactive_user_by_email");
        let result = sqlx::query("DELETE FROM users WHERE email = $1 AND is_active = false")
            .bind(email)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Create an inactive user together with their student profile.
    pub async fn create_student(
        &self,
        user: NewUser,
        profile: NewStudentProfile,
    ) -> Result<(UserEntity, StudentProfileEntity), sqlx::Error> {
        let timer = QueryTimer::new("create_student");
        let mut tx = self.pool.begin().await?;

        let user_row = insert_user(&mut tx, &user).await?;

        let profile_row = sqlx::query_as::<_, StudentProfileEntity>(
            r#"
            INSERT INTO student_profiles
                (user_id, description, matric_no, department, faculty, level, cgpa,
                 skills, expected_grad_year, resume_url, linkedin_url, github_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, user_id, description, matric_no, department, faculty, level, cgpa,
                      skills, expected_grad_year, resume_url, linkedin_url, github_url, created_at
            "#,
        )
        .bind(user_row.id)
        .bind(&profile.description)
        .bind(&profile.matric_no)
        .bind(&profile.department)
        .bind(&profile.faculty)
        .bind(profile.level)
        .bind(profile.cgpa)
        .bind(&profile.skills)
        .bind(profile.expected_grad_year)
        .bind(&profile.resume_url)
        .bind(&profile.linkedin_url)
        .bind(&profile.github_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok((user_row, profile_row))
    }

    /// Create an inactive user together with their alumni profile.
    pub async fn create_alumnus(
        &self,
        user: NewUser,
        profile: NewAlumniProfile,
    ) -> Result<(UserEntity, AlumniProfileEntity), sqlx::Error> {
        let timer = QueryTimer::new("create_alumnus");
        let mut tx = self.pool.begin().await?;

        let user_row = insert_user(&mut tx, &user).await?;

        let profile_row = sqlx::query_as::<_, AlumniProfileEntity>(
            r#"
            INSERT INTO alumni_profiles
                (user_id, description, matric_no, department, faculty, grad_year,
                 current_job_title, current_company, industry, years_of_exp,
                 linkedin_url, github_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, user_id, description, matric_no, department, faculty, grad_year,
                      current_job_title, current_company, industry, years_of_exp,
                      linkedin_url, github_url, created_at
            "#,
        )
        .bind(user_row.id)
        .bind(&profile.description)
        .bind(&profile.matric_no)
        .bind(&profile.department)
        .bind(&profile.faculty)
        .bind(profile.grad_year)
        .bind(&profile.current_job_title)
        .bind(&profile.current_company)
        .bind(&profile.industry)
        .bind(profile.years_of_exp)
        .bind(&profile.linkedin_url)
        .bind(&profile.github_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok((user_row, profile_row))
    }
}

async fn insert_user(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user: &NewUser,
) -> Result<UserEntity, sqlx::Error> {
    sqlx::query_as::<_, UserEntity>(&format!(
        r#"
        INSERT INTO users
            (email, password_hash, phone_num, role, firstname, lastname,
             middlename, street, city, state, country)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.phone_num)
    .bind(user.role)
    .bind(&user.firstname)
    .bind(&user.lastname)
    .bind(&user.middlename)
    .bind(&user.street)
    .bind(&user.city)
    .bind(&user.state)
    .bind(&user.country)
    .fetch_one(&mut **tx)
    .await
}
