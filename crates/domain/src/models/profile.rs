//! Role-specific profile models.
//!
//! Each user owns at most one profile matching their role. Students attach
//! an optional resume reference used by internship applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

lazy_static::lazy_static! {
    static ref MATRIC_NO_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Z]{2,4}/\d{2}/\d{4,6}$").unwrap();
}

/// Student profile owned by a user with the student role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub matric_no: String,
    pub department: String,
    pub faculty: String,
    pub level: i32,
    pub cgpa: f64,
    pub skills: Vec<String>,
    pub expected_grad_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Alumni profile owned by a user with the alumnus role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AlumniProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub matric_no: String,
    pub department: String,
    pub faculty: String,
    pub grad_year: i32,
    pub current_job_title: String,
    pub current_company: String,
    pub industry: String,
    pub years_of_exp: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields for student signup.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateStudentProfile {
    pub description: Option<String>,

    #[validate(regex(
        path = *MATRIC_NO_REGEX,
        message = "Invalid matric number. Expected e.g. CSC/21/123456"
    ))]
    pub matric_no: String,

    #[validate(length(min = 2, max = 30, message = "Department is required"))]
    pub department: String,

    #[validate(length(min = 2, max = 20, message = "Faculty is required"))]
    pub faculty: String,

    /// Academic level (100-500 in hundreds).
    #[validate(custom(function = validate_level))]
    pub level: i32,

    #[validate(range(min = 0.0, max = 5.0, message = "CGPA must be between 0.00 and 5.00"))]
    pub cgpa: f64,

    #[serde(default)]
    pub skills: Vec<String>,

    #[validate(range(min = 2000, max = 2100, message = "Invalid graduation year"))]
    pub expected_grad_year: i32,

    #[validate(url(message = "resume_url must be a valid URL"))]
    pub resume_url: Option<String>,

    #[validate(url(message = "linkedin_url must be a valid URL"))]
    pub linkedin_url: Option<String>,

    #[validate(url(message = "github_url must be a valid URL"))]
    pub github_url: Option<String>,
}

/// Profile fields for alumnus signup.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateAlumniProfile {
    pub description: Option<String>,

    #[validate(regex(
        path = *MATRIC_NO_REGEX,
        message = "Invalid matric number. Expected e.g. CSC/21/123456"
    ))]
    pub matric_no: String,

    #[validate(length(min = 2, max = 30, message = "Department is required"))]
    pub department: String,

    #[validate(length(min = 2, max = 20, message = "Faculty is required"))]
    pub faculty: String,

    #[validate(range(min = 1950, max = 2100, message = "Invalid graduation year"))]
    pub grad_year: i32,

    #[validate(length(min = 1, max = 120, message = "Job title is required"))]
    pub current_job_title: String,

    #[validate(length(min = 1, max = 120, message = "Company is required"))]
    pub current_company: String,

    #[validate(length(min = 1, max = 100, message = "Industry is required"))]
    pub industry: String,

    #[validate(range(min = 0, max = 80, message = "years_of_exp must be 0-80"))]
    pub years_of_exp: i32,

    #[validate(url(message = "linkedin_url must be a valid URL"))]
    pub linkedin_url: Option<String>,

    #[validate(url(message = "github_url must be a valid URL"))]
    pub github_url: Option<String>,
}

fn validate_level(level: i32) -> Result<(), validator::ValidationError> {
    match level {
        100 | 200 | 300 | 400 | 500 => Ok(()),
        _ => Err(validator::ValidationError::new("level")
            .with_message("Level must be one of 100, 200, 300, 400, 500".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_profile() -> CreateStudentProfile {
        CreateStudentProfile {
            description: None,
            matric_no: "CSC/21/123456".into(),
            department: "Computer Science".into(),
            faculty: "SOC".into(),
            level: 400,
            cgpa: 4.21,
            skills: vec!["rust".into()],
            expected_grad_year: 2027,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
        }
    }

    #[test]
    fn test_valid_student_profile() {
        assert!(student_profile().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_matric_number() {
        let mut profile = student_profile();
        profile.matric_no = "123456".into();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_rejects_off_scale_level() {
        let mut profile = student_profile();
        profile.level = 250;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_rejects_cgpa_above_scale() {
        let mut profile = student_profile();
        profile.cgpa = 5.5;
        assert!(profile.validate().is_err());
    }
}
