//! Opportunity entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::opportunity::{
    EngagementType, Internship, Mentorship, WorkMode,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for internship work_mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "work_mode", rename_all = "lowercase")]
pub enum WorkModeDb {
    Remote,
    Hybrid,
    Onsite,
}

impl From<WorkModeDb> for WorkMode {
    fn from(db: WorkModeDb) -> Self {
        match db {
            WorkModeDb::Remote => WorkMode::Remote,
            WorkModeDb::Hybrid => WorkMode::Hybrid,
            WorkModeDb::Onsite => WorkMode::Onsite,
        }
    }
}

impl From<WorkMode> for WorkModeDb {
    fn from(mode: WorkMode) -> Self {
        match mode {
            WorkMode::Remote => WorkModeDb::Remote,
            WorkMode::Hybrid => WorkModeDb::Hybrid,
            WorkMode::Onsite => WorkModeDb::Onsite,
        }
    }
}

/// Database enum for internship engagement_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "engagement_type", rename_all = "snake_case")]
pub enum EngagementTypeDb {
    FullTime,
    PartTime,
    Contract,
}

impl From<EngagementTypeDb> for EngagementType {
    fn from(db: EngagementTypeDb) -> Self {
        match db {
            EngagementTypeDb::FullTime => EngagementType::FullTime,
            EngagementTypeDb::PartTime => EngagementType::PartTime,
            EngagementTypeDb::Contract => EngagementType::Contract,
        }
    }
}

impl From<EngagementType> for EngagementTypeDb {
    fn from(kind: EngagementType) -> Self {
        match kind {
            EngagementType::FullTime => EngagementTypeDb::FullTime,
            EngagementType::PartTime => EngagementTypeDb::PartTime,
            EngagementType::Contract => EngagementTypeDb::Contract,
        }
    }
}

/// Database row mapping for the mentorships table.
#[derive(Debug, Clone, FromRow)]
pub struct MentorshipEntity {
    pub id: Uuid,
    pub alumnus_id: Uuid,
    pub title: String,
    pub description: String,
    pub focus_areas: Vec<String>,
    pub max_slots: i32,
    pub remaining_slots: i32,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MentorshipEntity> for Mentorship {
    fn from(entity: MentorshipEntity) -> Self {
        Self {
            id: entity.id,
            alumnus_id: entity.alumnus_id,
            title: entity.title,
            description: entity.description,
            focus_areas: entity.focus_areas,
            max_slots: entity.max_slots,
            remaining_slots: entity.remaining_slots,
            is_active: entity.is_active,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the internships table.
#[derive(Debug, Clone, FromRow)]
pub struct InternshipEntity {
    pub id: Uuid,
    pub alumnus_id: Uuid,
    pub title: String,
    pub description: String,
    pub work_mode: WorkModeDb,
    pub engagement_type: EngagementTypeDb,
    pub location: String,
    pub industry: String,
    pub skills_required: Vec<String>,
    pub duration_weeks: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_paid: bool,
    pub stipend_minor: Option<i64>,
    pub require_resume: bool,
    pub require_cover_letter: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InternshipEntity> for Internship {
    fn from(entity: InternshipEntity) -> Self {
        Self {
            id: entity.id,
            alumnus_id: entity.alumnus_id,
            title: entity.title,
            description: entity.description,
            work_mode: entity.work_mode.into(),
            engagement_type: entity.engagement_type.into(),
            location: entity.location,
            industry: entity.industry,
            skills_required: entity.skills_required,
            duration_weeks: entity.duration_weeks,
            start_date: entity.start_date,
            end_date: entity.end_date,
            is_paid: entity.is_paid,
            stipend_minor: entity.stipend_minor,
            require_resume: entity.require_resume,
            require_cover_letter: entity.require_cover_letter,
            is_active: entity.is_active,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
