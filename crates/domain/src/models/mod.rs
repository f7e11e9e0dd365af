//! Domain models for Alumniverse.

pub mod engagement;
pub mod event;
pub mod opportunity;
pub mod otp;
pub mod profile;
pub mod proposal;
pub mod user;

pub use engagement::{Engagement, EngagementSource, EngagementStatus};
pub use event::{Event, Ticket, TicketPurchase};
pub use opportunity::{Internship, Mentorship, OpportunityKind};
pub use otp::OneTimeCode;
pub use proposal::{Application, Offer, ProposalStatus};
pub use user::{User, UserRole};
