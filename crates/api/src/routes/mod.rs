//! Route handlers.

pub mod applications;
pub mod auth;
pub mod engagements;
pub mod events;
pub mod health;
pub mod internships;
pub mod mentorships;
pub mod offers;

use uuid::Uuid;

use domain::models::opportunity::OpportunityKind;
use persistence::repositories::{InternshipRepository, MentorshipRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// The slice of an opportunity the proposal handlers need.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpportunityRef {
    pub owner_id: Uuid,
    pub accepts_proposals: bool,
    pub require_resume: bool,
}

/// Resolve an opportunity by kind and id, or 404.
pub(crate) async fn resolve_opportunity(
    state: &AppState,
    kind: OpportunityKind,
    opportunity_id: Uuid,
) -> Result<OpportunityRef, ApiError> {
    match kind {
        OpportunityKind::Mentorship => {
            let mentorship = MentorshipRepository::new(state.pool.clone())
                .find_by_id(opportunity_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Mentorship not found".to_string()))?;
            let mentorship: domain::models::Mentorship = mentorship.into();
            Ok(OpportunityRef {
                owner_id: mentorship.alumnus_id,
                accepts_proposals: mentorship.accepts_proposals(),
                require_resume: false,
            })
        }
        OpportunityKind::Internship => {
            let internship = InternshipRepository::new(state.pool.clone())
                .find_by_id(opportunity_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Internship not found".to_string()))?;
            let internship: domain::models::Internship = internship.into();
            Ok(OpportunityRef {
                owner_id: internship.alumnus_id,
                accepts_proposals: internship.accepts_proposals(),
                require_resume: internship.require_resume,
            })
        }
    }
}
