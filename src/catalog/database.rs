//! Table registry for tinydb
//!
//! The [`Database`] maps table names to table instances, routes inserts and
//! selections to them, and hosts the cross-table join and aggregation.

use std::fs;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::executor::{aggregate, join, AggregateOp, AggregateResult};
use crate::storage::{CsvFileStore, Row};
use crate::table::{
    DepartmentTable, EmployeeProjectTable, EmployeeTable, ProjectTable, Selection, Separator,
    Table,
};

/// Registry name of the employee table in a standard database
pub const EMPLOYEES: &str = "employees";
/// Registry name of the department table in a standard database
pub const DEPARTMENTS: &str = "departments";
/// Registry name of the project table in a standard database
pub const PROJECTS: &str = "projects";
/// Registry name of the assignment table in a standard database
pub const EMPLOYEES_PROJECTS: &str = "employees_projects";

/// Named tables, in registration order
#[derive(Debug, Default)]
pub struct Database {
    tables: IndexMap<String, Box<dyn Table>>,
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the four standard tables, each bound to its CSV file inside the
    /// configured data directory
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        if !config.data_dir.exists() {
            fs::create_dir_all(&config.data_dir)?;
        }

        let store = |file: &str| CsvFileStore::new(config.data_dir.join(file));
        let load = config.load_existing;
        let files = &config.files;

        let mut db = Self::new();
        db.register_table(EMPLOYEES, EmployeeTable::new(store(files.employees.as_str()), load)?);
        db.register_table(
            DEPARTMENTS,
            DepartmentTable::new(store(files.departments.as_str()), load)?,
        );
        db.register_table(PROJECTS, ProjectTable::new(store(files.projects.as_str()), load)?);
        db.register_table(
            EMPLOYEES_PROJECTS,
            EmployeeProjectTable::new(store(files.employees_projects.as_str()), load)?,
        );

        info!(
            data_dir = %config.data_dir.display(),
            load_existing = load,
            "opened database"
        );
        Ok(db)
    }

    /// Bind `name` to `table`, replacing any previous binding
    pub fn register_table(&mut self, name: impl Into<String>, table: impl Table + 'static) {
        self.register_boxed(name, Box::new(table));
    }

    pub fn register_boxed(&mut self, name: impl Into<String>, table: Box<dyn Table>) {
        let name = name.into();
        info!(
            table = %name,
            kind = table.kind().label(),
            rows = table.rows().len(),
            "registered table"
        );
        self.tables.insert(name, table);
    }

    /// Look up a registered table
    pub fn table(&self, name: &str) -> Option<&dyn Table> {
        self.tables.get(name).map(|t| t.as_ref())
    }

    /// Registered table names, in registration order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Insert raw delimited data into a registered table
    pub fn insert(&mut self, table_name: &str, data: &str, separator: Separator) -> Result<()> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))?;
        debug!(table = table_name, "insert");
        table.insert(data, separator)
    }

    /// Select from a registered table.
    ///
    /// `Ok(None)` means no table of that name exists, as opposed to
    /// `Ok(Some(vec![]))` for a selection matching nothing.
    pub fn select(&self, table_name: &str, selection: &Selection) -> Result<Option<Vec<Row>>> {
        match self.tables.get(table_name) {
            Some(table) => {
                let rows = table.select(selection)?;
                debug!(table = table_name, %selection, rows = rows.len(), "select");
                Ok(Some(rows))
            }
            None => Ok(None),
        }
    }

    /// Chain equality join, see [`join::join`]
    pub fn join<S: AsRef<str>>(&self, tables: &[S], join_attrs: &[Vec<S>]) -> Result<Vec<Row>> {
        join::join(self, tables, join_attrs)
    }

    /// Column aggregation, see [`aggregate::aggregate`]
    pub fn aggregate(
        &self,
        table_name: &str,
        column: &str,
        operation: AggregateOp,
        group_by: Option<&str>,
    ) -> Result<AggregateResult> {
        aggregate::aggregate(self, table_name, column, operation, group_by)
    }
}
