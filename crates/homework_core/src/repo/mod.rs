//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by all services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store writes run record validation before persistence.
//! - Store APIs surface semantic errors (`DuplicateAssignment`) in addition
//!   to DB transport errors.

pub mod record_store;
