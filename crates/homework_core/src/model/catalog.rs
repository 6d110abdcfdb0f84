//! Class and section records.
//!
//! # Invariants
//! - Names are non-blank and stored trimmed.
//! - `Section::class_id` always references an existing class.
//! - Records are immutable after creation; only the catalog reset removes them.

use crate::model::validation::{normalize_text, require_text, RecordValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one class (grade level).
pub type ClassId = Uuid;

/// Stable identifier of one section within a class.
pub type SectionId = Uuid;

/// Persisted class row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
}

/// Persisted section row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    /// Owning class.
    pub class_id: ClassId,
}

/// Insert shape for a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
}

impl NewClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("class", "name", &self.name)
    }

    /// Returns a validated copy with trimmed fields.
    pub fn normalized(&self) -> Result<Self, RecordValidationError> {
        self.validate()?;
        Ok(Self {
            name: normalize_text(&self.name),
        })
    }
}

/// Insert shape for a section under an existing class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    pub class_id: ClassId,
    pub name: String,
}

impl NewSection {
    pub fn new(class_id: ClassId, name: impl Into<String>) -> Self {
        Self {
            class_id,
            name: name.into(),
        }
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("section", "name", &self.name)
    }

    /// Returns a validated copy with trimmed fields.
    pub fn normalized(&self) -> Result<Self, RecordValidationError> {
        self.validate()?;
        Ok(Self {
            class_id: self.class_id,
            name: normalize_text(&self.name),
        })
    }
}
