//! Domain model for the class → section → assignment hierarchy.
//!
//! # Responsibility
//! - Define canonical record shapes used by the record store and services.
//! - Provide one validation entry point per insert shape.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned UUID.
//! - Insert shapes are validated (and trimmed) before any SQL mutation.

pub mod assignment;
pub mod catalog;
pub mod validation;
