//! Engagement entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::engagement::{Engagement, EngagementSource, EngagementStatus};
use sqlx::FromRow;
use uuid::Uuid;

use super::proposal::OpportunityKindDb;

/// Database enum for engagement_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "engagement_status", rename_all = "lowercase")]
pub enum EngagementStatusDb {
    Active,
    Completed,
    Terminated,
}

impl From<EngagementStatusDb> for EngagementStatus {
    fn from(db: EngagementStatusDb) -> Self {
        match db {
            EngagementStatusDb::Active => EngagementStatus::Active,
            EngagementStatusDb::Completed => EngagementStatus::Completed,
            EngagementStatusDb::Terminated => EngagementStatus::Terminated,
        }
    }
}

impl From<EngagementStatus> for EngagementStatusDb {
    fn from(status: EngagementStatus) -> Self {
        match status {
            EngagementStatus::Active => EngagementStatusDb::Active,
            EngagementStatus::Completed => EngagementStatusDb::Completed,
            EngagementStatus::Terminated => EngagementStatusDb::Terminated,
        }
    }
}

/// Database row mapping for the engagements table.
///
/// The source back-reference is stored as a (source_kind, source_id) pair
/// and rebuilt into the tagged union on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct EngagementEntity {
    pub id: Uuid,
    pub opportunity_kind: OpportunityKindDb,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
    pub alumnus_id: Uuid,
    pub source_kind: String,
    pub source_id: Uuid,
    pub status: EngagementStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EngagementEntity> for Engagement {
    type Error = String;

    fn try_from(entity: EngagementEntity) -> Result<Self, Self::Error> {
        let source = EngagementSource::from_parts(&entity.source_kind, entity.source_id)
            .ok_or_else(|| format!("unknown engagement source kind: {}", entity.source_kind))?;

        Ok(Self {
            id: entity.id,
            opportunity_kind: entity.opportunity_kind.into(),
            opportunity_id: entity.opportunity_id,
            student_id: entity.student_id,
            alumnus_id: entity.alumnus_id,
            source,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
