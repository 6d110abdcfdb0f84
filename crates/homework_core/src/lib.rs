//! Core domain logic for the school homework log.
//! This crate is the single source of truth for catalog and assignment rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::{Assignment, AssignmentId, NewAssignment};
pub use model::catalog::{Class, ClassId, NewClass, NewSection, Section, SectionId};
pub use model::validation::RecordValidationError;
pub use repo::record_store::{Collection, RecordStore, RepoError, RepoResult, SqliteRecordStore};
pub use service::assignment_service::{
    AssignmentService, AssignmentServiceError, DUPLICATE_PERIOD_MESSAGE,
};
pub use service::catalog_seed::{
    CatalogConfig, CatalogInitializer, CatalogSeedError, CatalogSummary,
};
pub use service::hierarchy_service::{HierarchyService, HierarchyServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
