//! Opportunity models: mentorships and internships.
//!
//! Both are owned by an alumnus and soft-deleted with a tombstone so
//! proposals and engagements keep resolving. A mentorship tracks remaining
//! slots; an internship gates new proposals on `is_active` alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which opportunity subsystem a proposal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    Mentorship,
    Internship,
}

impl OpportunityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityKind::Mentorship => "mentorship",
            OpportunityKind::Internship => "internship",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mentorship" => Some(OpportunityKind::Mentorship),
            "internship" => Some(OpportunityKind::Internship),
            _ => None,
        }
    }
}

/// A mentorship listing with a bounded number of mentee slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Mentorship {
    pub id: Uuid,
    pub alumnus_id: Uuid,
    pub title: String,
    pub description: String,
    pub focus_areas: Vec<String>,
    pub max_slots: i32,
    pub remaining_slots: i32,
    pub is_active: bool,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mentorship {
    /// Whether new offers/applications may target this mentorship.
    pub fn accepts_proposals(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// Remote/hybrid/onsite work mode for internships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

/// Full-time/part-time/contract engagement type for internships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    FullTime,
    PartTime,
    Contract,
}

/// An internship listing; applicants are unbounded while active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Internship {
    pub id: Uuid,
    pub alumnus_id: Uuid,
    pub title: String,
    pub description: String,
    pub work_mode: WorkMode,
    pub engagement_type: EngagementType,
    pub location: String,
    pub industry: String,
    pub skills_required: Vec<String>,
    pub duration_weeks: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stipend_minor: Option<i64>,
    pub require_resume: bool,
    pub require_cover_letter: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Internship {
    pub fn accepts_proposals(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// Request to create a mentorship.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMentorshipRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be 3-255 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[serde(default)]
    pub focus_areas: Vec<String>,

    #[validate(range(min = 1, max = 100, message = "max_slots must be between 1 and 100"))]
    pub max_slots: i32,
}

/// Request to update mutable mentorship fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMentorshipRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be 3-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    pub focus_areas: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Request to create an internship.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInternshipRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be 3-255 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    pub work_mode: WorkMode,
    pub engagement_type: EngagementType,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    #[validate(length(min = 1, max = 100, message = "Industry is required"))]
    pub industry: String,

    #[serde(default)]
    pub skills_required: Vec<String>,

    #[validate(range(min = 1, max = 104, message = "duration_weeks must be 1-104"))]
    pub duration_weeks: i32,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub is_paid: bool,

    #[validate(range(min = 0, message = "stipend_minor must not be negative"))]
    pub stipend_minor: Option<i64>,

    #[serde(default = "default_true")]
    pub require_resume: bool,

    #[serde(default)]
    pub require_cover_letter: bool,
}

fn default_true() -> bool {
    true
}

impl CreateInternshipRequest {
    /// Date-order check that validator derives can't express.
    pub fn check_dates(&self) -> Result<(), &'static str> {
        if self.end_date < self.start_date {
            return Err("end_date must not be before start_date");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(
            OpportunityKind::parse("mentorship"),
            Some(OpportunityKind::Mentorship)
        );
        assert_eq!(
            OpportunityKind::parse("internship"),
            Some(OpportunityKind::Internship)
        );
        assert_eq!(OpportunityKind::parse("apprenticeship"), None);
    }

    #[test]
    fn test_mentorship_accepts_proposals() {
        let mut mentorship = Mentorship {
            id: Uuid::new_v4(),
            alumnus_id: Uuid::new_v4(),
            title: "Backend mentorship".into(),
            description: "Weekly pairing sessions".into(),
            focus_areas: vec![],
            max_slots: 3,
            remaining_slots: 3,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(mentorship.accepts_proposals());

        mentorship.is_active = false;
        assert!(!mentorship.accepts_proposals());

        mentorship.is_active = true;
        mentorship.is_deleted = true;
        assert!(!mentorship.accepts_proposals());
    }

    #[test]
    fn test_internship_date_order() {
        let request = CreateInternshipRequest {
            title: "Platform intern".into(),
            description: "Work on the events pipeline".into(),
            work_mode: WorkMode::Remote,
            engagement_type: EngagementType::FullTime,
            location: "Lagos".into(),
            industry: "Software".into(),
            skills_required: vec![],
            duration_weeks: 12,
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            is_paid: true,
            stipend_minor: Some(150_000_00),
            require_resume: true,
            require_cover_letter: false,
        };
        assert!(request.check_dates().is_err());
    }
}
