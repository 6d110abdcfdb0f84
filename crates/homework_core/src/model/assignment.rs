//! Homework assignment records.
//!
//! # Responsibility
//! - Define the persisted assignment row and its insert request shape.
//! - Own the single validation function run before every assignment insert.
//!
//! # Invariants
//! - `date`, `day_name` and `period` are non-blank; every text field is
//!   stored trimmed. Lesson details may be empty.
//! - For one `(class_id, section_id)` pair, `(date, period)` is unique.
//! - `date` is an opaque calendar string; no calendar arithmetic happens here.

use crate::model::catalog::{ClassId, SectionId};
use crate::model::validation::{normalize_text, require_text, RecordValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one assignment.
pub type AssignmentId = Uuid;

/// Persisted assignment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub class_id: ClassId,
    pub section_id: SectionId,
    /// Calendar date as rendered by the host application (Hijri).
    pub date: String,
    /// Localized weekday name, e.g. `الأحد`.
    pub day_name: String,
    /// Period label within the school day, e.g. `1` or `الأولى`.
    pub period: String,
    pub subject: String,
    pub lesson_title: String,
    pub homework: String,
}

impl Assignment {
    /// Returns whether this row occupies the given day slot.
    pub fn occupies(&self, date: &str, period: &str) -> bool {
        self.date == date && self.period == period
    }

    /// Strips the identifier, yielding the request shape that produced it.
    pub fn to_request(&self) -> NewAssignment {
        NewAssignment {
            class_id: self.class_id,
            section_id: self.section_id,
            date: self.date.clone(),
            day_name: self.day_name.clone(),
            period: self.period.clone(),
            subject: self.subject.clone(),
            lesson_title: self.lesson_title.clone(),
            homework: self.homework.clone(),
        }
    }
}

/// Request to record one homework assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub class_id: ClassId,
    pub section_id: SectionId,
    pub date: String,
    pub day_name: String,
    pub period: String,
    pub subject: String,
    pub lesson_title: String,
    pub homework: String,
}

impl NewAssignment {
    /// Checks the fields that identify the day slot.
    ///
    /// `subject`, `lesson_title` and `homework` may be empty, e.g. a period
    /// with no homework given.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("assignment", "date", &self.date)?;
        require_text("assignment", "day_name", &self.day_name)?;
        require_text("assignment", "period", &self.period)?;
        Ok(())
    }

    /// Returns a validated copy with trimmed text fields.
    ///
    /// Duplicate detection compares normalized values, so callers should
    /// normalize before checking existing rows.
    pub fn normalized(&self) -> Result<Self, RecordValidationError> {
        self.validate()?;
        Ok(Self {
            class_id: self.class_id,
            section_id: self.section_id,
            date: normalize_text(&self.date),
            day_name: normalize_text(&self.day_name),
            period: normalize_text(&self.period),
            subject: normalize_text(&self.subject),
            lesson_title: normalize_text(&self.lesson_title),
            homework: normalize_text(&self.homework),
        })
    }
}
