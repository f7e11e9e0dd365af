//! Business logic services.

pub mod visibility;

pub use visibility::{ProposalScope, ProposalViewer};
