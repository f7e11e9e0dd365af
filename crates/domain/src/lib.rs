//! Domain layer for the Alumniverse backend.
//!
//! This crate contains:
//! - Domain models (users, profiles, opportunities, proposals, engagements,
//!   events and tickets)
//! - Pure business rules: the proposal state machine, OTP verification,
//!   ticket purchasability checks
//! - The viewer capability used to scope list queries per role

pub mod models;
pub mod services;
