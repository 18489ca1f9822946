//! Department table

use super::{Selection, Table, TableData, TableKind};
use crate::catalog::{Schema, UniqueConstraint};
use crate::error::Result;
use crate::storage::{RecordStore, Row};

/// Departments, selected by exact name
#[derive(Debug)]
pub struct DepartmentTable {
    data: TableData,
}

impl DepartmentTable {
    pub const ATTRS: [&'static str; 2] = ["id", "department_name"];

    pub fn table_schema() -> Schema {
        Schema::new(Self::ATTRS).unique(UniqueConstraint::single("id"))
    }

    pub fn new(store: impl RecordStore + 'static, load_data: bool) -> Result<Self> {
        let data = TableData::open(
            TableKind::Department,
            Self::table_schema(),
            Box::new(store),
            load_data,
        )?;
        Ok(Self { data })
    }
}

impl Table for DepartmentTable {
    fn data(&self) -> &TableData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    fn select(&self, selection: &Selection) -> Result<Vec<Row>> {
        match selection {
            Selection::DepartmentName(name) => Ok(self
                .data
                .rows()
                .iter()
                .filter(|row| row.get("department_name") == Some(name))
                .cloned()
                .collect()),
            other => Err(self.data.unsupported(other)),
        }
    }
}
