//! Assignment read and validate-then-write service.
//!
//! # Responsibility
//! - List assignments recorded for one `(class, section)` pair.
//! - Validate new assignments against the hierarchy and the existing rows
//!   before writing them.
//!
//! # Invariants
//! - For one `(class, section)` pair, `(date, period)` is never stored twice.
//! - The section named by a request must belong to the request's class.
//! - A rejected request performs no write.

use crate::model::assignment::{Assignment, AssignmentId, NewAssignment};
use crate::model::catalog::{ClassId, SectionId};
use crate::model::validation::RecordValidationError;
use crate::repo::record_store::{RecordStore, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Localized message shown when a period is already taken for the day.
pub const DUPLICATE_PERIOD_MESSAGE: &str = "هذه الحصة مسجلة مسبقاً لهذا اليوم";

/// Errors from assignment service operations.
#[derive(Debug)]
pub enum AssignmentServiceError {
    /// A required field is blank.
    Validation(RecordValidationError),
    /// Referenced class does not exist.
    ClassNotFound(ClassId),
    /// Referenced section does not exist.
    SectionNotFound(SectionId),
    /// Section exists but belongs to a different class.
    MismatchedHierarchy {
        section_id: SectionId,
        expected_class_id: ClassId,
        actual_class_id: ClassId,
    },
    /// The `(date, period)` slot is already recorded for this pair.
    DuplicatePeriod { date: String, period: String },
    /// Record store failure.
    Repo(RepoError),
}

impl AssignmentServiceError {
    /// Message suitable for direct display to end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicatePeriod { .. } => DUPLICATE_PERIOD_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for AssignmentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ClassNotFound(id) => write!(f, "class not found: {id}"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::MismatchedHierarchy {
                section_id,
                expected_class_id,
                actual_class_id,
            } => write!(
                f,
                "section {section_id} belongs to class {actual_class_id}, not {expected_class_id}"
            ),
            Self::DuplicatePeriod { date, period } => write!(
                f,
                "period `{period}` is already recorded for date `{date}`"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssignmentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssignmentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::DuplicateAssignment { date, period, .. } => {
                Self::DuplicatePeriod { date, period }
            }
            other => Self::Repo(other),
        }
    }
}

impl From<RecordValidationError> for AssignmentServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Assignment use-case facade over a record store.
pub struct AssignmentService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> AssignmentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists every assignment recorded for `(class_id, section_id)`.
    ///
    /// Unknown ids yield an empty list.
    pub fn get_assignments(
        &self,
        class_id: ClassId,
        section_id: SectionId,
    ) -> Result<Vec<Assignment>, AssignmentServiceError> {
        self.store
            .list_assignments_by_class_section(class_id, section_id)
            .map_err(Into::into)
    }

    /// Records one assignment after validation and duplicate checks.
    ///
    /// # Contract
    /// - Fails with `DuplicatePeriod` when the pair already has a row with the
    ///   same trimmed `date` and `period`; nothing is written in that case.
    /// - A concurrent writer that wins the race is caught by the storage
    ///   unique index and reported as `DuplicatePeriod` as well.
    pub fn add_assignment(
        &self,
        request: &NewAssignment,
    ) -> Result<AssignmentId, AssignmentServiceError> {
        let request = request.normalized()?;
        self.ensure_hierarchy(request.class_id, request.section_id)?;

        let existing = self
            .store
            .list_assignments_by_class_section(request.class_id, request.section_id)?;
        if existing
            .iter()
            .any(|assignment| assignment.occupies(&request.date, &request.period))
        {
            warn!(
                "event=assignment_add module=service status=rejected reason=duplicate_period class_id={} section_id={}",
                request.class_id, request.section_id
            );
            return Err(AssignmentServiceError::DuplicatePeriod {
                date: request.date,
                period: request.period,
            });
        }

        let id = self.store.insert_assignment(&request)?;
        info!(
            "event=assignment_add module=service status=ok class_id={} section_id={} assignment_id={id}",
            request.class_id, request.section_id
        );
        Ok(id)
    }

    fn ensure_hierarchy(
        &self,
        class_id: ClassId,
        section_id: SectionId,
    ) -> Result<(), AssignmentServiceError> {
        if self.store.get_class(class_id)?.is_none() {
            return Err(AssignmentServiceError::ClassNotFound(class_id));
        }
        let section = self
            .store
            .get_section(section_id)?
            .ok_or(AssignmentServiceError::SectionNotFound(section_id))?;
        if section.class_id != class_id {
            return Err(AssignmentServiceError::MismatchedHierarchy {
                section_id,
                expected_class_id: class_id,
                actual_class_id: section.class_id,
            });
        }
        Ok(())
    }
}
