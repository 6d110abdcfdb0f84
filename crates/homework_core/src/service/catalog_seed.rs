//! Bulk catalog seeding and reset.
//!
//! # Responsibility
//! - Populate the fixed class/section catalog from `CatalogConfig`.
//! - Wipe all records and reseed in dependency-safe order.
//!
//! # Invariants
//! - Reset deletes assignments, then sections, then classes.
//! - Seeding creates classes in configured order, each immediately followed
//!   by its sections in configured order.
//! - No transaction spans a reset; a mid-sequence failure leaves a partial
//!   catalog behind.

use crate::model::catalog::{NewClass, NewSection};
use crate::repo::record_store::{Collection, RecordStore, RepoError};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const DEFAULT_CLASS_NAMES: &[&str] = &[
    "الأول متوسط",
    "الثاني متوسط",
    "الثالث متوسط",
    "الأول ثانوي",
    "الثاني ثانوي",
    "الثالث ثانوي",
];

const DEFAULT_SECTION_NAMES: &[&str] = &["أ", "ب", "ج"];

/// Ordered class and section names used for seeding.
///
/// Every class receives the full list of sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub class_names: Vec<String>,
    pub section_names: Vec<String>,
}

impl Default for CatalogConfig {
    /// Middle and secondary school grades with three sections each.
    fn default() -> Self {
        Self {
            class_names: DEFAULT_CLASS_NAMES.iter().map(|name| name.to_string()).collect(),
            section_names: DEFAULT_SECTION_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl CatalogConfig {
    pub fn new(
        class_names: impl IntoIterator<Item = impl Into<String>>,
        section_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            class_names: class_names.into_iter().map(Into::into).collect(),
            section_names: section_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Rejects empty lists and blank names.
    pub fn validate(&self) -> Result<(), CatalogSeedError> {
        if self.class_names.is_empty() {
            return Err(CatalogSeedError::InvalidConfig(
                "class_names must not be empty".to_string(),
            ));
        }
        if self.section_names.is_empty() {
            return Err(CatalogSeedError::InvalidConfig(
                "section_names must not be empty".to_string(),
            ));
        }
        if let Some(index) = self.class_names.iter().position(|n| n.trim().is_empty()) {
            return Err(CatalogSeedError::InvalidConfig(format!(
                "class_names[{index}] must not be blank"
            )));
        }
        if let Some(index) = self.section_names.iter().position(|n| n.trim().is_empty()) {
            return Err(CatalogSeedError::InvalidConfig(format!(
                "section_names[{index}] must not be blank"
            )));
        }
        Ok(())
    }

    /// Number of sections a full seed creates.
    pub fn expected_sections(&self) -> usize {
        self.class_names.len() * self.section_names.len()
    }
}

/// Counts produced by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub classes: usize,
    pub sections: usize,
    /// Assignments deleted by a reset; always 0 for plain initialization.
    pub assignments_removed: usize,
}

/// Errors from catalog seeding.
#[derive(Debug)]
pub enum CatalogSeedError {
    /// Seed configuration is unusable.
    InvalidConfig(String),
    /// Record store failure; the catalog may be partially written.
    Repo(RepoError),
}

impl Display for CatalogSeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(message) => write!(f, "invalid catalog config: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogSeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogSeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Seeds and resets the class/section catalog.
pub struct CatalogInitializer<S: RecordStore> {
    store: S,
    config: CatalogConfig,
}

impl<S: RecordStore> CatalogInitializer<S> {
    /// Creates an initializer after validating `config`.
    pub fn new(store: S, config: CatalogConfig) -> Result<Self, CatalogSeedError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Creates every configured class and its sections.
    ///
    /// Not idempotent: a second call duplicates the catalog.
    pub fn initialize(&self) -> Result<CatalogSummary, CatalogSeedError> {
        let started_at = Instant::now();
        let summary = self.seed().inspect_err(|err| {
            error!("event=catalog_init module=service status=error error={err}");
        })?;
        info!(
            "event=catalog_init module=service status=ok classes={} sections={} duration_ms={}",
            summary.classes,
            summary.sections,
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }

    /// Deletes all records, then seeds the configured catalog.
    ///
    /// Repeated calls always leave the same catalog shape behind.
    pub fn reset_and_initialize(&self) -> Result<CatalogSummary, CatalogSeedError> {
        let started_at = Instant::now();
        let result = self.clear().and_then(|assignments_removed| {
            let mut summary = self.seed()?;
            summary.assignments_removed = assignments_removed;
            Ok(summary)
        });

        match result {
            Ok(summary) => {
                info!(
                    "event=catalog_reset module=service status=ok assignments_removed={} classes={} sections={} duration_ms={}",
                    summary.assignments_removed,
                    summary.classes,
                    summary.sections,
                    started_at.elapsed().as_millis()
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=catalog_reset module=service status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn clear(&self) -> Result<usize, CatalogSeedError> {
        let assignments = self.store.list_assignments()?;
        for assignment in &assignments {
            self.store
                .delete_by_id(Collection::Assignments, assignment.id)?;
        }

        for section in self.store.list_sections()? {
            self.store.delete_by_id(Collection::Sections, section.id)?;
        }

        for class in self.store.list_classes()? {
            self.store.delete_by_id(Collection::Classes, class.id)?;
        }

        Ok(assignments.len())
    }

    fn seed(&self) -> Result<CatalogSummary, CatalogSeedError> {
        let mut summary = CatalogSummary::default();
        for class_name in &self.config.class_names {
            let class_id = self.store.insert_class(&NewClass::new(class_name.as_str()))?;
            summary.classes += 1;

            for section_name in &self.config.section_names {
                self.store
                    .insert_section(&NewSection::new(class_id, section_name.as_str()))?;
                summary.sections += 1;
            }
        }
        Ok(summary)
    }
}
