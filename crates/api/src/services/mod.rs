//! Collaborator services and orchestration.

pub mod calendar;
pub mod email;
pub mod payment;
pub mod registration;

pub use calendar::CalendarService;
pub use email::{EmailMessage, EmailService};
pub use payment::PaymentService;
pub use registration::RegistrationService;
