//! Shared utilities for the Alumniverse backend.
//!
//! This crate provides common functionality used across the other crates:
//! - Password hashing with Argon2id
//! - JWT issue and validation
//! - Offset pagination types

pub mod jwt;
pub mod pagination;
pub mod password;
