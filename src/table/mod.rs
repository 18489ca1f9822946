//! Tables
//!
//! A table is a schema-bound, ordered collection of rows mirrored into a
//! [`RecordStore`]. Every successful insert rewrites the whole store.
//!
//! The four concrete tables share [`TableData`] for storage and constraint
//! checking and differ in how rows are split, validated and selected.

pub mod department;
pub mod employee;
pub mod employee_project;
pub mod project;

pub use department::DepartmentTable;
pub use employee::EmployeeTable;
pub use employee_project::EmployeeProjectTable;
pub use project::ProjectTable;

use std::fmt;

use tracing::{debug, warn};

use crate::catalog::{Schema, UniqueConstraint};
use crate::error::{Error, Result, ValidationError};
use crate::storage::{RecordStore, Row};

/// Field separator for raw insert data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Space,
    Comma,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Space => ' ',
            Separator::Comma => ',',
        }
    }
}

/// Table-specific selection predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Numeric `id` within `start..=end`
    IdRange { start: i64, end: i64 },
    /// Exact `department_name`
    DepartmentName(String),
    /// Employee/project assignment lookup; at least one id must be given
    Assignment {
        employee_id: Option<i64>,
        project_id: Option<i64>,
    },
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::IdRange { start, end } => write!(f, "id range {}..={}", start, end),
            Selection::DepartmentName(name) => write!(f, "department name '{}'", name),
            Selection::Assignment { .. } => write!(f, "assignment lookup"),
        }
    }
}

/// Concrete table variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Employee,
    Department,
    Project,
    EmployeeProject,
}

impl TableKind {
    /// Name used in error messages
    pub fn label(self) -> &'static str {
        match self {
            TableKind::Employee => "EmployeeTable",
            TableKind::Department => "DepartmentTable",
            TableKind::Project => "ProjectTable",
            TableKind::EmployeeProject => "EmployeeProjectTable",
        }
    }
}

/// Rows, schema and store shared by every table variant
#[derive(Debug)]
pub struct TableData {
    kind: TableKind,
    schema: Schema,
    store: Box<dyn RecordStore>,
    rows: Vec<Row>,
}

impl TableData {
    /// Bind a schema to a store, optionally loading the persisted rows
    pub fn open(
        kind: TableKind,
        schema: Schema,
        store: Box<dyn RecordStore>,
        load_data: bool,
    ) -> Result<Self> {
        let mut data = Self {
            kind,
            schema,
            store,
            rows: Vec::new(),
        };
        if load_data {
            data.load()?;
        }
        Ok(data)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Replace the in-memory rows with the persisted ones
    pub fn load(&mut self) -> Result<()> {
        self.rows = self.store.load(self.schema.attrs())?;
        debug!(table = self.kind.label(), rows = self.rows.len(), "loaded table");
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(self.schema.attrs(), &self.rows)
    }

    /// Reject a row whose value count differs from the attribute count
    pub fn check_shape(&self, value_count: usize) -> Result<()> {
        if value_count != self.schema.attr_count() {
            return Err(Error::SchemaMismatch {
                table: self.kind.label().to_string(),
                expected: self.schema.attr_count(),
                found: value_count,
            });
        }
        Ok(())
    }

    /// Reject a row that collides with an existing one on any constraint
    pub fn check_unique(&self, candidate: &Row) -> Result<()> {
        for constraint in self.schema.unique_constraints() {
            if self
                .rows
                .iter()
                .any(|existing| constraint.conflicts(existing, candidate))
            {
                let values = constraint
                    .attrs()
                    .iter()
                    .map(|attr| candidate.get(attr).map(String::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(Error::UniqueViolation {
                    table: self.kind.label().to_string(),
                    columns: constraint.to_string(),
                    values,
                });
            }
        }
        Ok(())
    }

    /// Append and write the full table through to the store.
    ///
    /// The row stays in memory even when the write fails.
    pub fn append(&mut self, row: Row) -> Result<()> {
        self.rows.push(row);
        if let Err(e) = self.save() {
            warn!(
                table = self.kind.label(),
                location = %self.store.location(),
                error = %e,
                "store write failed after in-memory append"
            );
            return Err(e);
        }
        debug!(table = self.kind.label(), rows = self.rows.len(), "inserted row");
        Ok(())
    }

    /// Rows whose numeric `column` equals `value`; non-numeric cells never match
    fn matches_int(row: &Row, column: &str, value: i64) -> bool {
        parse_int(row, column) == Some(value)
    }

    /// Rows whose numeric `id` lies in `start..=end`
    pub fn select_id_range(&self, start: i64, end: i64) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|row| parse_int(row, "id").is_some_and(|id| start <= id && id <= end))
            .cloned()
            .collect()
    }

    fn unsupported(&self, selection: &Selection) -> Error {
        Error::Validation(ValidationError::UnsupportedSelection {
            table: self.kind.label().to_string(),
            selection: selection.to_string(),
        })
    }
}

fn parse_int(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(|v| v.trim().parse::<i64>().ok())
}

/// Capability interface implemented by every concrete table
pub trait Table: fmt::Debug + Send {
    fn data(&self) -> &TableData;

    fn data_mut(&mut self) -> &mut TableData;

    /// Apply the table's selection predicate
    fn select(&self, selection: &Selection) -> Result<Vec<Row>>;

    /// Separator actually used for raw insert data
    fn separator(&self, requested: Separator) -> Separator {
        requested
    }

    /// Validate a candidate row built from `value_count` raw values
    fn validate(&self, _row: &Row, value_count: usize) -> Result<()> {
        self.data().check_shape(value_count)
    }

    /// Split `raw`, validate, enforce uniqueness, append and persist
    fn insert(&mut self, raw: &str, separator: Separator) -> Result<()> {
        let sep = self.separator(separator).as_char();
        let values: Vec<&str> = raw.split(sep).collect();
        let row = self.data().schema().zip_row(values.iter().copied());

        self.validate(&row, values.len())?;
        self.data().check_unique(&row)?;
        self.data_mut().append(row)
    }

    fn load(&mut self) -> Result<()> {
        self.data_mut().load()
    }

    fn save(&self) -> Result<()> {
        self.data().save()
    }

    fn kind(&self) -> TableKind {
        self.data().kind
    }

    fn schema(&self) -> &Schema {
        self.data().schema()
    }

    /// Variant name, e.g. `EmployeeTable`
    fn name(&self) -> &'static str {
        self.kind().label()
    }

    fn attrs(&self) -> &[String] {
        self.data().schema().attrs()
    }

    fn unique_attrs(&self) -> &[UniqueConstraint] {
        self.data().schema().unique_constraints()
    }

    fn rows(&self) -> &[Row] {
        self.data().rows()
    }
}
