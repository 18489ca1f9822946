//! Employee table

use super::{Selection, Table, TableData, TableKind};
use crate::catalog::{Schema, UniqueConstraint};
use crate::error::Result;
use crate::storage::{RecordStore, Row};

/// Employees, selected by id range
#[derive(Debug)]
pub struct EmployeeTable {
    data: TableData,
}

impl EmployeeTable {
    pub const ATTRS: [&'static str; 5] = ["id", "name", "age", "salary", "department_id"];

    pub fn table_schema() -> Schema {
        Schema::new(Self::ATTRS)
            .unique(UniqueConstraint::single("id"))
            .unique(UniqueConstraint::single("department_id"))
    }

    pub fn new(store: impl RecordStore + 'static, load_data: bool) -> Result<Self> {
        let data = TableData::open(
            TableKind::Employee,
            Self::table_schema(),
            Box::new(store),
            load_data,
        )?;
        Ok(Self { data })
    }
}

impl Table for EmployeeTable {
    fn data(&self) -> &TableData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    fn select(&self, selection: &Selection) -> Result<Vec<Row>> {
        match selection {
            Selection::IdRange { start, end } => Ok(self.data.select_id_range(*start, *end)),
            other => Err(self.data.unsupported(other)),
        }
    }
}
