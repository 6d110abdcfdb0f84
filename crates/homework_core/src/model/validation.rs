//! Field-level validation shared by all insert shapes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected insert shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Required text field is empty after trim.
    BlankField {
        record: &'static str,
        field: &'static str,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { record, field } => {
                write!(f, "{record}.{field} must not be blank")
            }
        }
    }
}

impl Error for RecordValidationError {}

pub(crate) fn require_text(
    record: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField { record, field });
    }
    Ok(())
}

pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}
