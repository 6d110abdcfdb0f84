//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into use-case level APIs.
//! - Enforce hierarchy and duplicate-period rules above the storage layer.
//! - Keep callers decoupled from storage details.

pub mod assignment_service;
pub mod catalog_seed;
pub mod hierarchy_service;
