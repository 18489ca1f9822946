//! Interactive shell
//!
//! Parses command lines (see [`command`]) and runs them against a
//! [`Database`], rendering results as text tables or JSON.

pub mod command;
pub mod format;

pub use command::{parse_command, parse_selection, Command};
pub use format::format_rows;

use serde::Serialize;

use crate::catalog::Database;
use crate::error::{Error, Result};
use crate::storage::Row;

pub const HELP: &str = r#"
Commands:
  insert <table> [--sep=,|--sep=space] <data>
                                     Insert one row (space separated by default)
  select employees <start_id> <end_id>
  select projects <start_id> <end_id>
  select departments <name>
  select employees_projects [employee=<id>] [project=<id>]
  join <t1,t2,...> <t1.a=t2.b> ...  Chain equality join
  aggregate <table> <SUM|AVG|MIN|MAX|COUNT> <column> [by <column>]

  .tables            List all tables
  .schema [table]    Show table schema
  .json on|off       Toggle JSON output
  .help              Show this help message
  .quit              Exit
"#;

/// What the caller should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text
    Print(String),
    /// Leave the shell
    Quit,
}

/// Command interpreter bound to a database
#[derive(Debug)]
pub struct Shell {
    db: Database,
    json: bool,
}

impl Shell {
    pub fn new(db: Database) -> Self {
        Self { db, json: false }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Parse and run one input line
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        match parse_command(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Print(String::new())),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let text = match command {
            Command::Insert {
                table,
                separator,
                data,
            } => {
                self.db.insert(&table, &data, separator)?;
                "1 row inserted\n".to_string()
            }
            Command::Select { table, args } => {
                let kind = match self.db.table(&table) {
                    Some(t) => t.kind(),
                    None => return Ok(Outcome::Print(format!("No such table '{}'\n", table))),
                };
                let selection = parse_selection(kind, &args)?;
                match self.db.select(&table, &selection)? {
                    Some(rows) => self.render(&rows)?,
                    None => format!("No such table '{}'\n", table),
                }
            }
            Command::Join { tables, pairs } => {
                let rows = self.db.join(&tables, &pairs)?;
                self.render(&rows)?
            }
            Command::Aggregate {
                table,
                operation,
                column,
                group_by,
            } => {
                let result =
                    self.db
                        .aggregate(&table, &column, operation, group_by.as_deref())?;
                if self.json {
                    to_json(&result)?
                } else {
                    format_rows(&result.into_rows())
                }
            }
            Command::Tables => {
                let names = self.db.table_names();
                if names.is_empty() {
                    "No tables found.\n".to_string()
                } else {
                    let mut out = "Tables:\n".to_string();
                    for name in names {
                        out.push_str(&format!("  {}\n", name));
                    }
                    out
                }
            }
            Command::Schema(Some(table)) => self.schema_info(&table)?,
            Command::Schema(None) => {
                let mut out = String::new();
                for name in self.db.table_names() {
                    out.push_str(&self.schema_info(name)?);
                }
                out
            }
            Command::Json(on) => {
                self.json = on;
                format!("JSON output {}\n", if on { "on" } else { "off" })
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Print(text))
    }

    fn render(&self, rows: &[Row]) -> Result<String> {
        if self.json {
            to_json(&rows)
        } else {
            Ok(format_rows(rows))
        }
    }

    fn schema_info(&self, name: &str) -> Result<String> {
        let table = self
            .db
            .table(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;

        let unique = table
            .unique_attrs()
            .iter()
            .map(|c| format!("({})", c))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "Table: {} [{}]\n  Attributes: {}\n  Unique: {}\n  Store: {}\n  Rows: {}\n",
            name,
            table.name(),
            table.attrs().join(", "),
            unique,
            table.data().store().location(),
            table.rows().len()
        ))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::InvalidCommand(format!("cannot render JSON: {}", e)))?;
    json.push('\n');
    Ok(json)
}
