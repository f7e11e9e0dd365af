//! Request extractors.

pub mod auth;

pub use auth::{require_alumnus, require_student, resolve_viewer, AuthUser};
