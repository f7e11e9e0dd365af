//! Engagement ledger model.
//!
//! An engagement is the single authoritative record that a student is
//! actively engaged in an opportunity. At most one engagement may exist per
//! (opportunity, student) pair, however many offers and applications were
//! exchanged; the persistence layer backs this with a unique constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::opportunity::OpportunityKind;

/// Engagement lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    Active,
    Completed,
    Terminated,
}

impl EngagementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementStatus::Active => "active",
            EngagementStatus::Completed => "completed",
            EngagementStatus::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EngagementStatus::Active),
            "completed" => Some(EngagementStatus::Completed),
            "terminated" => Some(EngagementStatus::Terminated),
            _ => None,
        }
    }
}

/// Weak back-reference to the proposal an engagement was created from.
///
/// Relation plus lookup only: the source record's lifecycle is independent
/// and this is never used for cascading deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EngagementSource {
    Offer(Uuid),
    Application(Uuid),
}

impl EngagementSource {
    /// Splits into the (tag, id) pair stored in the database.
    pub fn into_parts(self) -> (&'static str, Uuid) {
        match self {
            EngagementSource::Offer(id) => ("offer", id),
            EngagementSource::Application(id) => ("application", id),
        }
    }

    /// Rebuilds the tagged union from stored parts.
    pub fn from_parts(kind: &str, id: Uuid) -> Option<Self> {
        match kind {
            "offer" => Some(EngagementSource::Offer(id)),
            "application" => Some(EngagementSource::Application(id)),
            _ => None,
        }
    }
}

/// The active-relationship record created on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Engagement {
    pub id: Uuid,
    pub opportunity_kind: OpportunityKind,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
    pub alumnus_id: Uuid,
    pub source: EngagementSource,
    pub status: EngagementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Engagement {
    pub fn is_active(&self) -> bool {
        self.status == EngagementStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            EngagementStatus::Active,
            EngagementStatus::Completed,
            EngagementStatus::Terminated,
        ] {
            assert_eq!(EngagementStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EngagementStatus::parse("paused"), None);
    }

    #[test]
    fn test_source_parts_roundtrip() {
        let id = Uuid::new_v4();

        let (kind, stored) = EngagementSource::Offer(id).into_parts();
        assert_eq!(kind, "offer");
        assert_eq!(
            EngagementSource::from_parts(kind, stored),
            Some(EngagementSource::Offer(id))
        );

        let (kind, stored) = EngagementSource::Application(id).into_parts();
        assert_eq!(kind, "application");
        assert_eq!(
            EngagementSource::from_parts(kind, stored),
            Some(EngagementSource::Application(id))
        );

        assert_eq!(EngagementSource::from_parts("referral", id), None);
    }

    #[test]
    fn test_only_active_engagements_are_active() {
        let mut engagement = Engagement {
            id: Uuid::new_v4(),
            opportunity_kind: OpportunityKind::Mentorship,
            opportunity_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            alumnus_id: Uuid::new_v4(),
            source: EngagementSource::Offer(Uuid::new_v4()),
            status: EngagementStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(engagement.is_active());

        engagement.status = EngagementStatus::Completed;
        assert!(!engagement.is_active());
    }
}
