//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod engagement;
pub mod event;
pub mod opportunity;
pub mod otp;
pub mod profile;
pub mod proposal;
pub mod user;

pub use engagement::{EngagementEntity, EngagementStatusDb};
pub use event::{EventEntity, TicketEntity, TicketPurchaseEntity};
pub use opportunity::{
    EngagementTypeDb, InternshipEntity, MentorshipEntity, WorkModeDb,
};
pub use otp::OneTimeCodeEntity;
pub use profile::{AlumniProfileEntity, StudentProfileEntity};
pub use proposal::{ApplicationEntity, OfferEntity, OpportunityKindDb, ProposalStatusDb};
pub use user::{UserEntity, UserRoleDb};
