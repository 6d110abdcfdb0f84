//! Class/section catalog service.
//!
//! # Responsibility
//! - Expose class and section listing for the selection flow.
//! - Create single classes and sections with referential checks.
//!
//! # Invariants
//! - Read paths never fail on unknown ids; they return empty results.
//! - A section is only created under an existing class.

use crate::model::catalog::{Class, ClassId, NewClass, NewSection, Section, SectionId};
use crate::model::validation::RecordValidationError;
use crate::repo::record_store::{RecordStore, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from hierarchy service operations.
#[derive(Debug)]
pub enum HierarchyServiceError {
    /// Name is blank after trim.
    Validation(RecordValidationError),
    /// Parent class does not exist.
    ClassNotFound(ClassId),
    /// Record store failure.
    Repo(RepoError),
}

impl Display for HierarchyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ClassNotFound(id) => write!(f, "class not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HierarchyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ClassNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for HierarchyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<RecordValidationError> for HierarchyServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Catalog facade over a record store.
pub struct HierarchyService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> HierarchyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists all classes.
    pub fn get_classes(&self) -> Result<Vec<Class>, HierarchyServiceError> {
        self.store.list_classes().map_err(Into::into)
    }

    /// Lists sections owned by `class_id`.
    ///
    /// An unknown class yields an empty list; callers treat that as
    /// "no sections", not as an error.
    pub fn get_sections(&self, class_id: ClassId) -> Result<Vec<Section>, HierarchyServiceError> {
        self.store
            .list_sections_by_class(class_id)
            .map_err(Into::into)
    }

    pub fn get_class(&self, class_id: ClassId) -> Result<Option<Class>, HierarchyServiceError> {
        self.store.get_class(class_id).map_err(Into::into)
    }

    pub fn get_section(
        &self,
        section_id: SectionId,
    ) -> Result<Option<Section>, HierarchyServiceError> {
        self.store.get_section(section_id).map_err(Into::into)
    }

    /// Creates one class.
    pub fn add_class(&self, name: impl Into<String>) -> Result<ClassId, HierarchyServiceError> {
        let request = NewClass::new(name);
        request.validate()?;
        let id = self.store.insert_class(&request)?;
        info!("event=class_add module=service status=ok class_id={id}");
        Ok(id)
    }

    /// Creates one section under an existing class.
    pub fn add_section(
        &self,
        class_id: ClassId,
        name: impl Into<String>,
    ) -> Result<SectionId, HierarchyServiceError> {
        let request = NewSection::new(class_id, name);
        request.validate()?;
        if self.store.get_class(class_id)?.is_none() {
            warn!("event=section_add module=service status=rejected reason=class_not_found class_id={class_id}");
            return Err(HierarchyServiceError::ClassNotFound(class_id));
        }
        let id = self.store.insert_section(&request)?;
        info!("event=section_add module=service status=ok class_id={class_id} section_id={id}");
        Ok(id)
    }
}
