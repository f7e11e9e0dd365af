//! Offer and application lifecycle.
//!
//! Offers (owner -> student) and applications (student -> opportunity) share
//! one state machine: `pending -> accepted | rejected | withdrawn`, all three
//! outcomes terminal. `responded_at` is stamped on any terminal transition.
//! The guards here are pure; the repositories re-enforce the pending check
//! inside conditional UPDATEs so concurrent responders cannot both win.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::opportunity::OpportunityKind;

/// Proposal state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ProposalStatus::Pending),
            "accepted" => Some(ProposalStatus::Accepted),
            "rejected" => Some(ProposalStatus::Rejected),
            "withdrawn" => Some(ProposalStatus::Withdrawn),
            _ => None,
        }
    }

    /// Every state except `Pending` is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }
}

/// Why a lifecycle operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Proposal has already been responded to")]
    AlreadyResolved,

    #[error("Actor is not authorized for this proposal")]
    Forbidden,
}

/// Why proposal creation was refused before reaching `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreationError {
    #[error("Opportunity is not accepting proposals")]
    OpportunityInactive,

    #[error("A pending proposal already exists for this pair")]
    Duplicate,

    #[error("A resume is required for this application")]
    ResumeRequired,
}

/// An offer from an opportunity owner to a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Offer {
    pub id: Uuid,
    pub opportunity_kind: OpportunityKind,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
    pub status: ProposalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    fn ensure_pending(&self) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::AlreadyResolved);
        }
        Ok(())
    }

    /// Accept/reject authorization: only the addressed student responds.
    pub fn ensure_may_respond(&self, actor_student_id: Uuid) -> Result<(), LifecycleError> {
        self.ensure_pending()?;
        if self.student_id != actor_student_id {
            return Err(LifecycleError::Forbidden);
        }
        Ok(())
    }

    /// Withdraw authorization: only the proposing owner, only while pending.
    pub fn ensure_may_withdraw(
        &self,
        opportunity_owner_id: Uuid,
        actor_alumnus_id: Uuid,
    ) -> Result<(), LifecycleError> {
        self.ensure_pending()?;
        if opportunity_owner_id != actor_alumnus_id {
            return Err(LifecycleError::Forbidden);
        }
        Ok(())
    }
}

/// An application from a student to an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Application {
    pub id: Uuid,
    pub opportunity_kind: OpportunityKind,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub status: ProposalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    fn ensure_pending(&self) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::AlreadyResolved);
        }
        Ok(())
    }

    /// Accept/reject authorization: only the opportunity owner responds.
    pub fn ensure_may_respond(
        &self,
        opportunity_owner_id: Uuid,
        actor_alumnus_id: Uuid,
    ) -> Result<(), LifecycleError> {
        self.ensure_pending()?;
        if opportunity_owner_id != actor_alumnus_id {
            return Err(LifecycleError::Forbidden);
        }
        Ok(())
    }

    /// Withdraw authorization: only the applying student, only while pending.
    pub fn ensure_may_withdraw(&self, actor_student_id: Uuid) -> Result<(), LifecycleError> {
        self.ensure_pending()?;
        if self.student_id != actor_student_id {
            return Err(LifecycleError::Forbidden);
        }
        Ok(())
    }
}

/// Checks the resume requirement before an application reaches `pending`.
pub fn ensure_resume_attached(
    require_resume: bool,
    resume_url: Option<&str>,
) -> Result<(), CreationError> {
    if require_resume && resume_url.map_or(true, |url| url.is_empty()) {
        return Err(CreationError::ResumeRequired);
    }
    Ok(())
}

/// Request to create an offer (opportunity owner).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateOfferRequest {
    pub opportunity_kind: OpportunityKind,
    pub opportunity_id: Uuid,
    pub student_id: Uuid,
}

/// Request to create an application (student).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateApplicationRequest {
    pub opportunity_kind: OpportunityKind,
    pub opportunity_id: Uuid,

    #[validate(url(message = "resume_url must be a valid URL"))]
    pub resume_url: Option<String>,

    #[validate(length(max = 10_000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(status: ProposalStatus, student_id: Uuid) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            opportunity_kind: OpportunityKind::Mentorship,
            opportunity_id: Uuid::new_v4(),
            student_id,
            status,
            responded_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn application(status: ProposalStatus, student_id: Uuid) -> Application {
        Application {
            id: Uuid::new_v4(),
            opportunity_kind: OpportunityKind::Internship,
            opportunity_id: Uuid::new_v4(),
            student_id,
            resume_url: None,
            cover_letter: None,
            status,
            responded_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ProposalStatus::Pending,
            ProposalStatus::Accepted,
            ProposalStatus::Rejected,
            ProposalStatus::Withdrawn,
        ] {
            assert_eq!(ProposalStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_only_pending_is_not_terminal() {
        assert!(!ProposalStatus::Pending.is_terminal());
        assert!(ProposalStatus::Accepted.is_terminal());
        assert!(ProposalStatus::Rejected.is_terminal());
        assert!(ProposalStatus::Withdrawn.is_terminal());
    }

    #[test]
    fn test_offer_respond_requires_addressed_student() {
        let student = Uuid::new_v4();
        let offer = offer(ProposalStatus::Pending, student);

        assert_eq!(offer.ensure_may_respond(student), Ok(()));
        assert_eq!(
            offer.ensure_may_respond(Uuid::new_v4()),
            Err(LifecycleError::Forbidden)
        );
    }

    #[test]
    fn test_offer_respond_refused_after_resolution() {
        let student = Uuid::new_v4();
        for status in [
            ProposalStatus::Accepted,
            ProposalStatus::Rejected,
            ProposalStatus::Withdrawn,
        ] {
            let offer = offer(status, student);
            assert_eq!(
                offer.ensure_may_respond(student),
                Err(LifecycleError::AlreadyResolved)
            );
        }
    }

    #[test]
    fn test_offer_withdraw_is_owner_only() {
        let owner = Uuid::new_v4();
        let offer = offer(ProposalStatus::Pending, Uuid::new_v4());

        assert_eq!(offer.ensure_may_withdraw(owner, owner), Ok(()));
        assert_eq!(
            offer.ensure_may_withdraw(owner, Uuid::new_v4()),
            Err(LifecycleError::Forbidden)
        );
    }

    #[test]
    fn test_offer_withdraw_only_while_pending() {
        let owner = Uuid::new_v4();
        let offer = offer(ProposalStatus::Withdrawn, Uuid::new_v4());
        assert_eq!(
            offer.ensure_may_withdraw(owner, owner),
            Err(LifecycleError::AlreadyResolved)
        );
    }

    #[test]
    fn test_application_respond_is_owner_only() {
        let owner = Uuid::new_v4();
        let application = application(ProposalStatus::Pending, Uuid::new_v4());

        assert_eq!(application.ensure_may_respond(owner, owner), Ok(()));
        assert_eq!(
            application.ensure_may_respond(owner, Uuid::new_v4()),
            Err(LifecycleError::Forbidden)
        );
    }

    #[test]
    fn test_application_withdraw_is_student_only() {
        let student = Uuid::new_v4();
        let application = application(ProposalStatus::Pending, student);

        assert_eq!(application.ensure_may_withdraw(student), Ok(()));
        assert_eq!(
            application.ensure_may_withdraw(Uuid::new_v4()),
            Err(LifecycleError::Forbidden)
        );
    }

    #[test]
    fn test_resume_requirement() {
        assert_eq!(
            ensure_resume_attached(true, None),
            Err(CreationError::ResumeRequired)
        );
        assert_eq!(
            ensure_resume_attached(true, Some("")),
            Err(CreationError::ResumeRequired)
        );
        assert_eq!(
            ensure_resume_attached(true, Some("https://cdn.example.com/cv.pdf")),
            Ok(())
        );
        assert_eq!(ensure_resume_attached(false, None), Ok(()));
    }
}
