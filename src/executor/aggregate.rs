//! Column aggregation
//!
//! Reduces one column of a table with SUM, AVG, MIN, MAX or COUNT, either over
//! the whole table or per distinct value of a group-by column. Groups come out
//! in the order their key is first seen.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::value::Value;
use crate::catalog::Database;
use crate::error::{Error, Result, ValidationError};
use crate::storage::Row;

/// Supported reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregateOp {
    pub const ALL: [AggregateOp; 5] = [
        AggregateOp::Sum,
        AggregateOp::Avg,
        AggregateOp::Min,
        AggregateOp::Max,
        AggregateOp::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggregateOp::Sum => "SUM",
            AggregateOp::Avg => "AVG",
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
            AggregateOp::Count => "COUNT",
        }
    }

    /// SUM and AVG only accept numeric columns
    pub fn requires_numeric(self) -> bool {
        matches!(self, AggregateOp::Sum | AggregateOp::Avg)
    }

    /// Result key, e.g. `AVG(salary)`
    pub fn result_key(self, column: &str) -> String {
        format!("{}({})", self.name(), column)
    }

    /// Reduce coerced values
    pub fn apply(self, values: &[Value], column: &str) -> Result<Value> {
        let empty = || {
            Error::Validation(ValidationError::EmptyColumn {
                operation: self.name().to_string(),
                column: column.to_string(),
            })
        };

        match self {
            AggregateOp::Count => Ok(Value::Integer(values.len() as i64)),
            AggregateOp::Sum => sum(self, values, column),
            AggregateOp::Avg => {
                if values.is_empty() {
                    return Err(empty());
                }
                let total = sum(self, values, column)?;
                let total = total.as_f64().ok_or_else(|| non_numeric(self, column))?;
                Ok(Value::Float(total / values.len() as f64))
            }
            AggregateOp::Min | AggregateOp::Max => {
                let (first, rest) = values.split_first().ok_or_else(empty)?;
                let mut best = first;
                for value in rest {
                    let ordering = value.compare(best).ok_or_else(|| Error::IncomparableValues {
                        left: value.type_name().to_string(),
                        right: best.type_name().to_string(),
                    })?;
                    // Ties keep the earliest value
                    let better = match self {
                        AggregateOp::Min => ordering.is_lt(),
                        _ => ordering.is_gt(),
                    };
                    if better {
                        best = value;
                    }
                }
                Ok(best.clone())
            }
        }
    }
}

fn non_numeric(op: AggregateOp, column: &str) -> Error {
    Error::NonNumericColumn {
        operation: op.name().to_string(),
        column: column.to_string(),
    }
}

fn sum(op: AggregateOp, values: &[Value], column: &str) -> Result<Value> {
    values.iter().try_fold(Value::Integer(0), |acc, value| {
        acc.add(value).ok_or_else(|| non_numeric(op, column))
    })
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AggregateOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AggregateOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::Validation(ValidationError::UnknownOperation(s.to_string())))
    }
}

/// Outcome of an aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregateResult {
    /// `{"<OP>(<column>)": value}`
    Single(Row),
    /// `{"<group_col>": key, "<OP>(<column>)": value}` per group
    Grouped(Vec<Row>),
}

impl AggregateResult {
    pub fn single(&self) -> Option<&Row> {
        match self {
            AggregateResult::Single(row) => Some(row),
            AggregateResult::Grouped(_) => None,
        }
    }

    pub fn groups(&self) -> Option<&[Row]> {
        match self {
            AggregateResult::Single(_) => None,
            AggregateResult::Grouped(rows) => Some(rows),
        }
    }

    /// Result rows, one for an ungrouped aggregation
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            AggregateResult::Single(row) => vec![row],
            AggregateResult::Grouped(rows) => rows,
        }
    }
}

fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Aggregate `column` of `table_name`, optionally grouped by `group_by`.
///
/// Arguments are validated before anything is computed; SUM and AVG then
/// reject a column holding any non-numeric value.
pub fn aggregate(
    db: &Database,
    table_name: &str,
    column: &str,
    operation: AggregateOp,
    group_by: Option<&str>,
) -> Result<AggregateResult> {
    let table = db
        .table(table_name)
        .ok_or_else(|| ValidationError::UnknownTable(table_name.to_string()))?;
    let schema = table.schema();

    for attr in std::iter::once(column).chain(group_by) {
        if !schema.has_attr(attr) {
            return Err(ValidationError::UnknownAttribute {
                table: table_name.to_string(),
                attribute: attr.to_string(),
            }
            .into());
        }
    }

    let rows = table.rows();
    let values: Vec<Value> = rows.iter().map(|row| Value::coerce(cell(row, column))).collect();

    if operation.requires_numeric() && !values.iter().all(Value::is_numeric) {
        return Err(non_numeric(operation, column));
    }

    let key = operation.result_key(column);
    debug!(
        table = table_name,
        %key,
        group_by = group_by.unwrap_or("-"),
        rows = rows.len(),
        "aggregate"
    );

    let group_by = match group_by {
        Some(group_by) => group_by,
        None => {
            let value = operation.apply(&values, column)?;
            let mut row = Row::new();
            row.insert(key, value.to_string());
            return Ok(AggregateResult::Single(row));
        }
    };

    let mut groups: IndexMap<&str, Vec<Value>> = IndexMap::new();
    for (row, value) in rows.iter().zip(values) {
        groups.entry(cell(row, group_by)).or_default().push(value);
    }

    let mut result = Vec::with_capacity(groups.len());
    for (group, values) in groups {
        let value = operation.apply(&values, column)?;
        let mut row = Row::new();
        row.insert(group_by.to_string(), group.to_string());
        row.insert(key.clone(), value.to_string());
        result.push(row);
    }
    Ok(AggregateResult::Grouped(result))
}
