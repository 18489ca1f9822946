//! Employee/project assignment table

use super::{Selection, Separator, Table, TableData, TableKind};
use crate::catalog::{Schema, UniqueConstraint};
use crate::error::Result;
use crate::storage::{RecordStore, Row};

/// Which employee works on which project in which role.
///
/// Raw insert data is always comma separated. The pair
/// (`employee_id`, `project_id`) is unique.
#[derive(Debug)]
pub struct EmployeeProjectTable {
    data: TableData,
}

impl EmployeeProjectTable {
    pub const ATTRS: [&'static str; 3] = ["employee_id", "project_id", "role"];

    pub fn table_schema() -> Schema {
        Schema::new(Self::ATTRS)
            .unique(UniqueConstraint::composite(["employee_id", "project_id"]))
    }

    pub fn new(store: impl RecordStore + 'static, load_data: bool) -> Result<Self> {
        let data = TableData::open(
            TableKind::EmployeeProject,
            Self::table_schema(),
            Box::new(store),
            load_data,
        )?;
        Ok(Self { data })
    }
}

impl Table for EmployeeProjectTable {
    fn data(&self) -> &TableData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    fn separator(&self, _requested: Separator) -> Separator {
        Separator::Comma
    }

    fn select(&self, selection: &Selection) -> Result<Vec<Row>> {
        let (employee_id, project_id) = match selection {
            Selection::Assignment {
                employee_id,
                project_id,
            } => (*employee_id, *project_id),
            other => return Err(self.data.unsupported(other)),
        };

        // No filter at all selects nothing
        if employee_id.is_none() && project_id.is_none() {
            return Ok(Vec::new());
        }

        Ok(self
            .data
            .rows()
            .iter()
            .filter(|row| {
                employee_id.map_or(true, |id| TableData::matches_int(row, "employee_id", id))
                    && project_id.map_or(true, |id| TableData::matches_int(row, "project_id", id))
            })
            .cloned()
            .collect())
    }
}
