//! Profile entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::profile::{AlumniProfile, StudentProfile};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the student_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct StudentProfileEntity {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub created_at: DateTime<Utc>,
}

impl From<StudentProfileEntity> for StudentProfile {
    fn from(entity: StudentProfileEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            description: entity.description,
            matric_no: entity.matric_no,
            department: entity.department,
            faculty: entity.faculty,
            level: entity.level,
            cgpa: entity.cgpa,
            skills: entity.skills,
            expected_grad_year: entity.expected_grad_year,
            resume_url: entity.resume_url,
            linkedin_url: entity.linkedin_url,
            github_url: entity.github_url,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the alumni_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct AlumniProfileEntity {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub created_at: DateTime<Utc>,
}

impl From<AlumniProfileEntity> for AlumniProfile {
    fn from(entity: AlumniProfileEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            description: entity.description,
            matric_no: entity.matric_no,
            department: entity.department,
            faculty: entity.faculty,
            grad_year: entity.grad_year,
            current_job_title: entity.current_job_title,
            current_company: entity.current_company,
            industry: entity.industry,
            years_of_exp: entity.years_of_exp,
            linkedin_url: entity.linkedin_url,
            github_url: entity.github_url,
            created_at: entity.created_at,
        }
    }
}
