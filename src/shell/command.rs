//! Shell command parsing
//!
//! ```text
//! insert <table> [--sep=,|--sep=space] <raw data>
//! select <table> <args...>
//! join <t1,t2,...> <a.x=b.y> [<b.z=c.w> ...]
//! aggregate <table> <OP> <column> [by <group_col>]
//! .tables | .schema [table] | .json on|off | .help | .quit
//! ```

use crate::error::{Error, Result};
use crate::executor::AggregateOp;
use crate::table::{Selection, Separator, TableKind};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert {
        table: String,
        separator: Separator,
        data: String,
    },
    /// Selection arguments are interpreted once the table kind is known
    Select {
        table: String,
        args: String,
    },
    Join {
        tables: Vec<String>,
        pairs: Vec<Vec<String>>,
    },
    Aggregate {
        table: String,
        operation: AggregateOp,
        column: String,
        group_by: Option<String>,
    },
    Tables,
    Schema(Option<String>),
    Json(bool),
    Help,
    Quit,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidCommand(message.into())
}

/// Split off the first whitespace-delimited word
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = next_word(line);
    let command = match keyword.to_lowercase().as_str() {
        "insert" => parse_insert(rest)?,
        "select" => {
            let (table, args) = next_word(rest);
            if table.is_empty() {
                return Err(invalid("usage: select <table> <args...>"));
            }
            Command::Select {
                table: table.to_string(),
                args: args.to_string(),
            }
        }
        "join" => parse_join(rest)?,
        "aggregate" => parse_aggregate(rest)?,
        ".tables" => Command::Tables,
        ".schema" => {
            let (table, _) = next_word(rest);
            Command::Schema((!table.is_empty()).then(|| table.to_string()))
        }
        ".json" => match rest {
            "on" => Command::Json(true),
            "off" => Command::Json(false),
            _ => return Err(invalid("usage: .json on|off")),
        },
        ".help" => Command::Help,
        ".quit" | ".exit" => Command::Quit,
        other => {
            return Err(invalid(format!(
                "unknown command '{}', type '.help' for available commands",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn parse_insert(rest: &str) -> Result<Command> {
    let (table, mut data) = next_word(rest);
    let mut separator = Separator::Space;

    if let Some(sep) = data.strip_prefix("--sep=") {
        let (value, remaining) = next_word(sep);
        separator = match value {
            "," | "comma" => Separator::Comma,
            "space" => Separator::Space,
            other => return Err(invalid(format!("unknown separator '{}'", other))),
        };
        data = remaining;
    }

    if table.is_empty() || data.is_empty() {
        return Err(invalid("usage: insert <table> [--sep=,|--sep=space] <data>"));
    }
    Ok(Command::Insert {
        table: table.to_string(),
        separator,
        data: data.to_string(),
    })
}

fn parse_join(rest: &str) -> Result<Command> {
    let (tables, pairs) = next_word(rest);
    if tables.is_empty() {
        return Err(invalid("usage: join <t1,t2,...> <a.x=b.y> ..."));
    }

    let tables = tables.split(',').map(str::to_string).collect();
    // A pair without '=' is kept as a single element and rejected by the join
    let pairs = pairs
        .split_whitespace()
        .map(|pair| pair.split('=').map(str::to_string).collect())
        .collect();
    Ok(Command::Join { tables, pairs })
}

fn parse_aggregate(rest: &str) -> Result<Command> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let (table, operation, column, group_by) = match words.as_slice() {
        [table, op, column] => (table, op, column, None),
        [table, op, column, by, group] if by.eq_ignore_ascii_case("by") => {
            (table, op, column, Some(group.to_string()))
        }
        _ => {
            return Err(invalid(
                "usage: aggregate <table> <SUM|AVG|MIN|MAX|COUNT> <column> [by <column>]",
            ))
        }
    };

    Ok(Command::Aggregate {
        table: table.to_string(),
        operation: operation.to_uppercase().parse()?,
        column: column.to_string(),
        group_by,
    })
}

fn parse_id(value: &str, what: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| invalid(format!("{} must be an integer, got '{}'", what, value)))
}

/// Interpret `select` arguments for a table of the given kind
pub fn parse_selection(kind: TableKind, args: &str) -> Result<Selection> {
    match kind {
        TableKind::Employee | TableKind::Project => {
            let words: Vec<&str> = args.split_whitespace().collect();
            match words.as_slice() {
                [start, end] => Ok(Selection::IdRange {
                    start: parse_id(start, "start_id")?,
                    end: parse_id(end, "end_id")?,
                }),
                _ => Err(invalid("usage: select <table> <start_id> <end_id>")),
            }
        }
        TableKind::Department => {
            if args.is_empty() {
                return Err(invalid("usage: select <table> <department_name>"));
            }
            Ok(Selection::DepartmentName(args.to_string()))
        }
        TableKind::EmployeeProject => {
            let mut employee_id = None;
            let mut project_id = None;
            for word in args.split_whitespace() {
                match word.split_once('=') {
                    Some(("employee", id)) => employee_id = Some(parse_id(id, "employee")?),
                    Some(("project", id)) => project_id = Some(parse_id(id, "project")?),
                    _ => {
                        return Err(invalid(
                            "usage: select <table> [employee=<id>] [project=<id>]",
                        ))
                    }
                }
            }
            Ok(Selection::Assignment {
                employee_id,
                project_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_insert_keeps_raw_data() {
        assert_eq!(
            parse("insert employees_projects 20,1,Customer Success Manager"),
            Command::Insert {
                table: "employees_projects".to_string(),
                separator: Separator::Space,
                data: "20,1,Customer Success Manager".to_string(),
            }
        );
        assert_eq!(
            parse("INSERT employees --sep=, 1,John,28,50000,1"),
            Command::Insert {
                table: "employees".to_string(),
                separator: Separator::Comma,
                data: "1,John,28,50000,1".to_string(),
            }
        );
        assert!(parse_command("insert employees").is_err());
        assert!(parse_command("insert employees --sep=; 1;2").is_err());
    }

    #[test]
    fn test_parse_join() {
        assert_eq!(
            parse("join employees,departments employees.department_id=departments.id"),
            Command::Join {
                tables: vec!["employees".to_string(), "departments".to_string()],
                pairs: vec![vec![
                    "employees.department_id".to_string(),
                    "departments.id".to_string()
                ]],
            }
        );
        match parse("join employees,departments employees.department_id") {
            Command::Join { pairs, .. } => assert_eq!(pairs[0].len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_aggregate() {
        assert_eq!(
            parse("aggregate employees avg salary"),
            Command::Aggregate {
                table: "employees".to_string(),
                operation: AggregateOp::Avg,
                column: "salary".to_string(),
                group_by: None,
            }
        );
        assert_eq!(
            parse("aggregate employees_projects COUNT employee_id by project_id"),
            Command::Aggregate {
                table: "employees_projects".to_string(),
                operation: AggregateOp::Count,
                column: "employee_id".to_string(),
                group_by: Some("project_id".to_string()),
            }
        );

        let err = parse_command("aggregate employees MEDIAN salary").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownOperation(_))
        ));
        assert!(parse_command("aggregate employees SUM").is_err());
    }

    #[test]
    fn test_parse_dot_commands() {
        assert_eq!(parse(".tables"), Command::Tables);
        assert_eq!(parse(".schema"), Command::Schema(None));
        assert_eq!(
            parse(".schema projects"),
            Command::Schema(Some("projects".to_string()))
        );
        assert_eq!(parse(".json on"), Command::Json(true));
        assert_eq!(parse(".exit"), Command::Quit);
        assert!(matches!(
            parse_command(".drop everything"),
            Err(Error::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_selection(TableKind::Employee, "1 5").unwrap(),
            Selection::IdRange { start: 1, end: 5 }
        );
        assert!(parse_selection(TableKind::Project, "1").is_err());
        assert!(parse_selection(TableKind::Project, "1 x").is_err());
        assert_eq!(
            parse_selection(TableKind::Department, "IT Support").unwrap(),
            Selection::DepartmentName("IT Support".to_string())
        );
        assert_eq!(
            parse_selection(TableKind::EmployeeProject, "project=2").unwrap(),
            Selection::Assignment {
                employee_id: None,
                project_id: Some(2)
            }
        );
        assert_eq!(
            parse_selection(TableKind::EmployeeProject, "").unwrap(),
            Selection::Assignment {
                employee_id: None,
                project_id: None
            }
        );
        assert!(parse_selection(TableKind::EmployeeProject, "role=Dev").is_err());
    }
}
