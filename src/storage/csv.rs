//! CSV record codec
//!
//! Minimal-quoting writer and a quote-aware reader for the delimited files
//! tables are stored in. Fields containing the delimiter, a quote or a line
//! break are wrapped in double quotes with embedded quotes doubled.

use crate::error::{Error, Result};

/// Field delimiter of the on-disk format
pub const DELIMITER: char = ',';

const QUOTE: char = '"';

/// Encode one record, terminated by `\r\n`
pub fn encode_record<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.into_iter().collect();
    let mut line = String::new();

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        // A lone empty field would read back as a blank line
        let needs_quotes = field.contains([DELIMITER, QUOTE, '\n', '\r'])
            || (fields.len() == 1 && field.is_empty());
        if needs_quotes {
            line.push(QUOTE);
            line.push_str(&field.replace(QUOTE, "\"\""));
            line.push(QUOTE);
        } else {
            line.push_str(field);
        }
    }

    line.push_str("\r\n");
    line
}

/// Parse CSV text into records.
///
/// Blank lines are skipped. Quoted fields may span lines.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Distinguishes `""` (one empty field) from a blank line
    let mut saw_field = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes => {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            }
            QUOTE => {
                in_quotes = true;
                saw_field = true;
            }
            DELIMITER if !in_quotes => {
                record.push(std::mem::take(&mut field));
                saw_field = true;
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                if saw_field || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                saw_field = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Storage(
            "unterminated quoted field at end of file".to_string(),
        ));
    }

    if saw_field || !field.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
