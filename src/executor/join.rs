//! Chain equality join
//!
//! Joins an ordered list of tables left to right with nested loops. Step `i`
//! matches the accumulated rows against table `i` on one `table.attribute`
//! pair. Output keys are qualified as `"<table>.<attribute>"`.

use tracing::debug;

use crate::catalog::Database;
use crate::error::{Result, ValidationError};
use crate::storage::Row;
use crate::table::Table;

/// A validated `table.attribute` reference
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrRef<'a> {
    qualified: &'a str,
    table: &'a str,
    attr: &'a str,
}

impl<'a> AttrRef<'a> {
    fn parse(db: &Database, reference: &'a str) -> Result<Self> {
        let (table_name, attr) = reference
            .split_once('.')
            .ok_or_else(|| ValidationError::UnqualifiedAttribute(reference.to_string()))?;

        let table = db
            .table(table_name)
            .ok_or_else(|| ValidationError::UnknownTable(table_name.to_string()))?;

        if !table.schema().has_attr(attr) {
            return Err(ValidationError::UnknownAttribute {
                table: table_name.to_string(),
                attribute: attr.to_string(),
            }
            .into());
        }

        Ok(Self {
            qualified: reference,
            table: table_name,
            attr,
        })
    }
}

/// Prefix every key of `row` with `"<table>."`
fn qualify(table: &str, row: &Row) -> Row {
    row.iter()
        .map(|(key, value)| (format!("{}.{}", table, key), value.clone()))
        .collect()
}

/// Join `tables` in order, step `i` using `join_attrs[i - 1]`.
///
/// Every argument is validated before any rows are touched: at least two
/// registered tables, exactly one pair per step, each pair two
/// `table.attribute` references to registered tables and existing attributes.
/// The left reference of a step must name a table already in the chain and
/// the right reference's attribute must exist in the table being joined.
pub fn join<S: AsRef<str>>(db: &Database, tables: &[S], join_attrs: &[Vec<S>]) -> Result<Vec<Row>> {
    if tables.len() < 2 {
        return Err(ValidationError::TooFewTables.into());
    }

    let mut chain: Vec<(&str, &dyn Table)> = Vec::with_capacity(tables.len());
    for name in tables {
        let name = name.as_ref();
        let table = db
            .table(name)
            .ok_or_else(|| ValidationError::UnknownTable(name.to_string()))?;
        chain.push((name, table));
    }

    if join_attrs.len() != tables.len() - 1 {
        return Err(ValidationError::JoinArity {
            tables: tables.len(),
            found: join_attrs.len(),
        }
        .into());
    }

    let mut steps: Vec<(AttrRef<'_>, AttrRef<'_>)> = Vec::with_capacity(join_attrs.len());
    for pair in join_attrs {
        if pair.len() != 2 {
            return Err(ValidationError::PairShape(pair.len()).into());
        }
        let left = AttrRef::parse(db, pair[0].as_ref())?;
        let right = AttrRef::parse(db, pair[1].as_ref())?;
        steps.push((left, right));
    }

    for (i, (left, right)) in steps.iter().enumerate() {
        let (joined_name, joined_table) = chain[i + 1];
        if !chain[..=i].iter().any(|(name, _)| *name == left.table) {
            return Err(ValidationError::DanglingReference {
                reference: left.qualified.to_string(),
                table: joined_name.to_string(),
            }
            .into());
        }
        if !joined_table.schema().has_attr(right.attr) {
            return Err(ValidationError::UnknownAttribute {
                table: joined_name.to_string(),
                attribute: right.attr.to_string(),
            }
            .into());
        }
    }

    let (first_name, first_table) = chain[0];
    let mut result: Vec<Row> = first_table
        .rows()
        .iter()
        .map(|row| qualify(first_name, row))
        .collect();

    for ((name, table), (left, right)) in chain[1..].iter().zip(&steps) {
        let mut next = Vec::new();
        for outer in &result {
            let key = outer.get(left.qualified);
            for inner in table.rows() {
                if key.is_some() && key == inner.get(right.attr) {
                    let mut merged = outer.clone();
                    merged.extend(qualify(name, inner));
                    next.push(merged);
                }
            }
        }
        debug!(
            table = *name,
            on = %format!("{} = {}", left.qualified, right.qualified),
            rows = next.len(),
            "join step"
        );
        result = next;
    }

    Ok(result)
}
