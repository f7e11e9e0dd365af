//! Persistence layer for the Alumniverse backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transactional acceptance
//!   path that keeps status changes, engagement creation and slot
//!   decrements atomic

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
