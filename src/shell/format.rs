//! Result rendering for the shell

use crate::storage::Row;

/// Format rows as a boxed text table.
///
/// Columns are taken from the first row; every row of a result carries the
/// same keys.
pub fn format_rows(rows: &[Row]) -> String {
    let columns: Vec<&str> = match rows.first() {
        Some(row) => row.keys().map(String::as_str).collect(),
        None => return "0 row(s) returned\n".to_string(),
    };

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            let len = row.get(*column).map(|v| v.chars().count()).unwrap_or(0);
            widths[i] = widths[i].max(len);
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    let mut output = String::new();

    // Header
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
        .collect::<Vec<_>>()
        .join("|");
    output.push_str(&format!("|{}|\n", header));
    output.push_str(&separator);

    // Rows
    for row in rows {
        let line: String = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let value = row.get(*c).map(String::as_str).unwrap_or("");
                format!(" {:<width$} ", value, width = *w)
            })
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(&format!("|{}|\n", line));
    }
    output.push_str(&separator);

    output.push_str(&format!("{} row(s) returned\n", rows.len()));
    output
}
