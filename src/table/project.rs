//! Project table

use chrono::NaiveDate;

use super::{Selection, Separator, Table, TableData, TableKind};
use crate::catalog::{Schema, UniqueConstraint};
use crate::error::{Error, Result};
use crate::storage::{RecordStore, Row};

/// ISO calendar date, `YYYY-MM-DD`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Projects with a validated date range, selected by id range.
///
/// Raw insert data is always comma separated.
#[derive(Debug)]
pub struct ProjectTable {
    data: TableData,
}

impl ProjectTable {
    pub const ATTRS: [&'static str; 4] = ["id", "name", "start_date", "end_date"];

    pub fn table_schema() -> Schema {
        Schema::new(Self::ATTRS).unique(UniqueConstraint::single("id"))
    }

    pub fn new(store: impl RecordStore + 'static, load_data: bool) -> Result<Self> {
        let data = TableData::open(
            TableKind::Project,
            Self::table_schema(),
            Box::new(store),
            load_data,
        )?;
        Ok(Self { data })
    }
}

/// `DDDD-DD-DD`, digits only apart from the two dashes
fn is_iso_date_shape(value: &str) -> bool {
    value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_date(row: &Row, column: &str) -> Result<NaiveDate> {
    let value = row.get(column).map(String::as_str).unwrap_or("");
    let invalid = || Error::InvalidDate {
        column: column.to_string(),
        value: value.to_string(),
    };
    // chrono tolerates padding, signs and short fields; require the exact shape
    if !is_iso_date_shape(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

impl Table for ProjectTable {
    fn data(&self) -> &TableData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    fn separator(&self, _requested: Separator) -> Separator {
        Separator::Comma
    }

    fn validate(&self, row: &Row, value_count: usize) -> Result<()> {
        self.data.check_shape(value_count)?;

        let start = parse_date(row, "start_date")?;
        let end = parse_date(row, "end_date")?;
        if start > end {
            return Err(Error::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(())
    }

    fn select(&self, selection: &Selection) -> Result<Vec<Row>> {
        match selection {
            Selection::IdRange { start, end } => Ok(self.data.select_id_range(*start, *end)),
            other => Err(self.data.unsupported(other)),
        }
    }
}
