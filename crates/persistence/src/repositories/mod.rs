//! Repository implementations for database operations.

pub mod application;
pub mod engagement;
pub mod event;
pub mod internship;
pub mod mentorship;
pub mod offer;
pub mod otp;
pub mod profile;
pub mod user;

pub use application::ApplicationRepository;
pub use engagement::EngagementRepository;
pub use event::EventRepository;
pub use internship::InternshipRepository;
pub use mentorship::MentorshipRepository;
pub use offer::OfferRepository;
pub use otp::OtpRepository;
pub use profile::ProfileRepository;
pub use user::UserRepository;

use thiserror::Error;

/// Name of the unique constraint backing the one-engagement-per-pair rule.
pub const ENGAGEMENT_PAIR_CONSTRAINT: &str = "engagements_opportunity_student_key";

/// Names of the partial unique indexes backing pending-proposal uniqueness.
pub const OFFER_PENDING_CONSTRAINT: &str = "offers_pending_pair_key";
pub const APPLICATION_PENDING_CONSTRAINT: &str = "applications_pending_pair_key";

/// Why a respond (accept/reject/withdraw) transaction was rolled back.
#[derive(Debug, Error)]
pub enum RespondError {
    /// The conditional status flip matched zero rows: the proposal left
    /// `pending` under a concurrent responder or an earlier call.
    #[error("Proposal has already been responded to")]
    AlreadyResolved,

    /// The engagement insert hit the unique pair constraint.
    #[error("An engagement already exists for this pair")]
    AlreadyEngaged,

    /// The conditional slot decrement matched zero rows.
    #[error("No mentorship slots remaining")]
    NoSlotsRemaining,

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Whether a sqlx error is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
