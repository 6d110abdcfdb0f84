//! Record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the `classes`, `sections` and `assignments` collections.
//! - Answer the two secondary-index lookups: sections by class and
//!   assignments by `(class, section)`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate and trim records before SQL mutations.
//! - Every call is one indivisible SQLite statement.
//! - Listings follow insertion order.
//! - `delete_by_id` is idempotent.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::assignment::{Assignment, AssignmentId, NewAssignment};
use crate::model::catalog::{Class, ClassId, NewClass, NewSection, Section, SectionId};
use crate::model::validation::RecordValidationError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CLASS_SELECT_SQL: &str = "SELECT id, name FROM classes";

const SECTION_SELECT_SQL: &str = "SELECT id, name, class_id FROM sections";

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    id,
    class_id,
    section_id,
    date,
    day_name,
    period,
    subject,
    lesson_title,
    homework
FROM assignments";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from record store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Insert shape failed validation.
    Validation(RecordValidationError),
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// Unique index on `(class_id, section_id, date, period)` rejected an insert.
    DuplicateAssignment {
        class_id: ClassId,
        section_id: SectionId,
        date: String,
        period: String,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateAssignment {
                class_id,
                section_id,
                date,
                period,
            } => write!(
                f,
                "assignment already stored for class {class_id} section {section_id} date `{date}` period `{period}`"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "record store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateAssignment { .. } => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Classes,
    Sections,
    Assignments,
}

impl Collection {
    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Sections => "sections",
            Self::Assignments => "assignments",
        }
    }
}

/// Storage contract for the three homework collections.
pub trait RecordStore {
    /// Inserts one class and returns its new id.
    fn insert_class(&self, class: &NewClass) -> RepoResult<ClassId>;
    /// Inserts one section and returns its new id.
    fn insert_section(&self, section: &NewSection) -> RepoResult<SectionId>;
    /// Inserts one assignment and returns its new id.
    fn insert_assignment(&self, assignment: &NewAssignment) -> RepoResult<AssignmentId>;
    /// Full scan of `classes`.
    fn list_classes(&self) -> RepoResult<Vec<Class>>;
    /// Full scan of `sections`.
    fn list_sections(&self) -> RepoResult<Vec<Section>>;
    /// Full scan of `assignments`.
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>>;
    /// Loads one class by id.
    fn get_class(&self, id: ClassId) -> RepoResult<Option<Class>>;
    /// Loads one section by id.
    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>>;
    /// Index lookup: sections owned by one class.
    fn list_sections_by_class(&self, class_id: ClassId) -> RepoResult<Vec<Section>>;
    /// Index lookup: assignments recorded for one `(class, section)` pair.
    fn list_assignments_by_class_section(
        &self,
        class_id: ClassId,
        section_id: SectionId,
    ) -> RepoResult<Vec<Assignment>>;
    /// Removes one record; absent ids are a no-op.
    fn delete_by_id(&self, collection: Collection, id: Uuid) -> RepoResult<()>;
    /// Number of rows in one collection.
    fn count(&self, collection: Collection) -> RepoResult<u64>;
}

/// SQLite-backed record store.
#[derive(Debug, Clone, Copy)]
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Creates a store from a migrated connection.
    ///
    /// Rejects connections that were not opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn insert_class(&self, class: &NewClass) -> RepoResult<ClassId> {
        let class = class.normalized()?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO classes (id, name) VALUES (?1, ?2);",
            params![id.to_string(), class.name],
        )?;
        debug!("event=record_insert module=repo status=ok collection=classes id={id}");
        Ok(id)
    }

    fn insert_section(&self, section: &NewSection) -> RepoResult<SectionId> {
        let section = section.normalized()?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO sections (id, name, class_id) VALUES (?1, ?2, ?3);",
            params![id.to_string(), section.name, section.class_id.to_string()],
        )?;
        debug!(
            "event=record_insert module=repo status=ok collection=sections id={id} class_id={}",
            section.class_id
        );
        Ok(id)
    }

    fn insert_assignment(&self, assignment: &NewAssignment) -> RepoResult<AssignmentId> {
        let assignment = assignment.normalized()?;
        let id = Uuid::new_v4();
        let inserted = self.conn.execute(
            "INSERT INTO assignments (
                id,
                class_id,
                section_id,
                date,
                day_name,
                period,
                subject,
                lesson_title,
                homework
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id.to_string(),
                assignment.class_id.to_string(),
                assignment.section_id.to_string(),
                assignment.date.as_str(),
                assignment.day_name.as_str(),
                assignment.period.as_str(),
                assignment.subject.as_str(),
                assignment.lesson_title.as_str(),
                assignment.homework.as_str(),
            ],
        );

        match inserted {
            Ok(_) => {
                debug!(
                    "event=record_insert module=repo status=ok collection=assignments id={id} class_id={} section_id={}",
                    assignment.class_id, assignment.section_id
                );
                Ok(id)
            }
            Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateAssignment {
                class_id: assignment.class_id,
                section_id: assignment.section_id,
                date: assignment.date,
                period: assignment.period,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn list_classes(&self) -> RepoResult<Vec<Class>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLASS_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_class_row(row)?);
        }
        Ok(items)
    }

    fn list_sections(&self) -> RepoResult<Vec<Section>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SECTION_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let rows = stmt.query([])?;
        collect_sections(rows)
    }

    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let rows = stmt.query([])?;
        collect_assignments(rows)
    }

    fn get_class(&self, id: ClassId) -> RepoResult<Option<Class>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLASS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_class_row(row)?));
        }
        Ok(None)
    }

    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SECTION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_section_row(row)?));
        }
        Ok(None)
    }

    fn list_sections_by_class(&self, class_id: ClassId) -> RepoResult<Vec<Section>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SECTION_SELECT_SQL}
             WHERE class_id = ?1
             ORDER BY rowid ASC;"
        ))?;
        let rows = stmt.query([class_id.to_string()])?;
        collect_sections(rows)
    }

    fn list_assignments_by_class_section(
        &self,
        class_id: ClassId,
        section_id: SectionId,
    ) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE class_id = ?1
               AND section_id = ?2
             ORDER BY rowid ASC;"
        ))?;
        let rows = stmt.query(params![class_id.to_string(), section_id.to_string()])?;
        collect_assignments(rows)
    }

    fn delete_by_id(&self, collection: Collection, id: Uuid) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", collection.table()),
            [id.to_string()],
        )?;
        debug!(
            "event=record_delete module=repo status=ok collection={} id={id} changed={changed}",
            collection.table()
        );
        Ok(())
    }

    fn count(&self, collection: Collection) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", collection.table()),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| {
            RepoError::InvalidData(format!(
                "negative row count `{count}` for {}",
                collection.table()
            ))
        })
    }
}

fn collect_sections(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Section>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_section_row(row)?);
    }
    Ok(items)
}

fn collect_assignments(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Assignment>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_assignment_row(row)?);
    }
    Ok(items)
}

fn parse_class_row(row: &Row<'_>) -> RepoResult<Class> {
    Ok(Class {
        id: parse_uuid(row, "classes", "id")?,
        name: row.get("name")?,
    })
}

fn parse_section_row(row: &Row<'_>) -> RepoResult<Section> {
    Ok(Section {
        id: parse_uuid(row, "sections", "id")?,
        name: row.get("name")?,
        class_id: parse_uuid(row, "sections", "class_id")?,
    })
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    Ok(Assignment {
        id: parse_uuid(row, "assignments", "id")?,
        class_id: parse_uuid(row, "assignments", "class_id")?,
        section_id: parse_uuid(row, "assignments", "section_id")?,
        date: row.get("date")?,
        day_name: row.get("day_name")?,
        period: row.get("period")?,
        subject: row.get("subject")?,
        lesson_title: row.get("lesson_title")?,
        homework: row.get("homework")?,
    })
}

fn parse_uuid(row: &Row<'_>, table: &str, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for collection in [
        Collection::Classes,
        Collection::Sections,
        Collection::Assignments,
    ] {
        if !table_exists(conn, collection.table())? {
            return Err(RepoError::MissingRequiredTable(collection.table()));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
