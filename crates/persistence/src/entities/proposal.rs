//! Offer and application entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::opportunity::OpportunityKind;
use domain::models::proposal::{Application, Offer, ProposalStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for opportunity_kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "opportunity_kind", rename_all = "lowercase")]
pub enum OpportunityKindDb {
    Mentorship,
    Internship,
}

impl From<OpportunityKindDb> for OpportunityKind {
    fn from(db: OpportunityKindDb) -> Self {
        match db {
            OpportunityKindDb::Mentorship => OpportunityKind::Mentorship,
            OpportunityKindDb::Internship => OpportunityKind::Internship,
        }
    }
}

impl From<OpportunityKind> for OpportunityKindDb {
    fn from(kind: OpportunityKind) -> Self {
        match kind {
            OpportunityKind::Mentorship => OpportunityKindDb::Mentorship,
            OpportunityKind::Internship => OpportunityKindDb::Internship,
        }
    }
}

/// Database enum for proposal_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "proposal_status", rename_all = "lowercase")]
pub enum ProposalStatusDb {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl From<ProposalStatusDb> for ProposalStatus {
    fn from(db: ProposalStatusDb) -> Self {
        match db {
            ProposalStatusDb::Pending => ProposalStatus::Pending,
            ProposalStatusDb::Accepted => ProposalStatus::Accepted,
            ProposalStatusDb::Rejected => ProposalStatus::Rejected,
            ProposalStatusDb::Withdrawn => ProposalStatus::Withdrawn,
        }
    }
}

impl From<ProposalStatus> for ProposalStatusDb {
    fn from(status: ProposalStatus) -> Self {
        match status {
            ProposalStatus::Pending => ProposalStatusDb::Pending,
            ProposalStatus::Accepted => ProposalStatusDb::Accepted,
            ProposalStatus::Rejected => ProposalStatusDb::Rejected,
            ProposalStatus::Withdrawn => ProposalStatusDb::Withdrawn,
        }
    }
}

/// Database row mapping for the offers table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferEntity {
    pub id: Uuid,
    pub opportunity_kind: OpportunityKindDb,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
    pub status: ProposalStatusDb,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OfferEntity> for Offer {
    fn from(entity: OfferEntity) -> Self {
        Self {
            id: entity.id,
            opportunity_kind: entity.opportunity_kind.into(),
            opportunity_id: entity.opportunity_id,
            student_id: entity.student_id,
            status: entity.status.into(),
            responded_at: entity.responded_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: Uuid,
    pub opportunity_kind: OpportunityKindDb,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub status: ProposalStatusDb,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationEntity> for Application {
    fn from(entity: ApplicationEntity) -> Self {
        Self {
            id: entity.id,
            opportunity_kind: entity.opportunity_kind.into(),
            opportunity_id: entity.opportunity_id,
            student_id: entity.student_id,
            resume_url: entity.resume_url,
            cover_letter: entity.cover_letter,
            status: entity.status.into(),
            responded_at: entity.responded_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
