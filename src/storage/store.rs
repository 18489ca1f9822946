//! Record stores
//!
//! A record store keeps the persisted rows of exactly one table. Saving always
//! replaces the whole table (header + rows); loading returns the rows in the
//! order they were saved.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::csv::{encode_record, parse_records};
use super::Row;
use crate::error::{Error, Result};

/// Durable storage for one table's rows
pub trait RecordStore: fmt::Debug + Send {
    /// Read all persisted rows. A store that does not exist yet holds zero rows.
    fn load(&self, attrs: &[String]) -> Result<Vec<Row>>;

    /// Overwrite the persisted table with `attrs` as header followed by `rows`.
    fn save(&self, attrs: &[String], rows: &[Row]) -> Result<()>;

    /// Human readable location, used in logs and `.schema` output
    fn location(&self) -> String;
}

/// CSV file store
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the new contents are written to before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for CsvFileStore {
    fn load(&self, attrs: &[String]) -> Result<Vec<Row>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store does not exist yet");
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path)?;
        let mut records = parse_records(&text)?.into_iter();

        let header = match records.next() {
            Some(header) => header,
            None => return Ok(Vec::new()),
        };

        // Rows are keyed by the file's header but returned in schema order
        let mut positions = Vec::with_capacity(attrs.len());
        for attr in attrs {
            let pos = header.iter().position(|h| h == attr).ok_or_else(|| {
                Error::Storage(format!(
                    "'{}' is missing column '{}' in its header",
                    self.path.display(),
                    attr
                ))
            })?;
            positions.push(pos);
        }
        if header.len() != attrs.len() {
            return Err(Error::Storage(format!(
                "'{}' has {} header columns, expected {}",
                self.path.display(),
                header.len(),
                attrs.len()
            )));
        }

        let mut rows = Vec::new();
        for (line, record) in records.enumerate() {
            if record.len() != header.len() {
                return Err(Error::Storage(format!(
                    "'{}' record {} has {} fields, expected {}",
                    self.path.display(),
                    line + 1,
                    record.len(),
                    header.len()
                )));
            }
            let row: Row = attrs
                .iter()
                .zip(&positions)
                .map(|(attr, &pos)| (attr.clone(), record[pos].clone()))
                .collect();
            rows.push(row);
        }

        debug!(path = %self.path.display(), rows = rows.len(), "loaded store");
        Ok(rows)
    }

    fn save(&self, attrs: &[String], rows: &[Row]) -> Result<()> {
        let mut contents = encode_record(attrs.iter().map(String::as_str));
        for row in rows {
            contents.push_str(&encode_record(
                attrs
                    .iter()
                    .map(|attr| row.get(attr).map(String::as_str).unwrap_or("")),
            ));
        }

        let staging = self.staging_path();
        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), rows = rows.len(), "saved store");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store. Clones share the same contents, so a second handle can
/// observe what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Option<Vec<Row>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the saved rows, `None` if nothing has been saved
    pub fn snapshot(&self) -> Option<Vec<Row>> {
        self.rows.lock().ok().and_then(|rows| rows.clone())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, attrs: &[String]) -> Result<Vec<Row>> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        let rows = rows.clone().unwrap_or_default();

        if let Some(row) = rows.iter().find(|row| row.len() != attrs.len()) {
            return Err(Error::Storage(format!(
                "memory store row has {} fields, expected {}",
                row.len(),
                attrs.len()
            )));
        }
        Ok(rows)
    }

    fn save(&self, _attrs: &[String], rows: &[Row]) -> Result<()> {
        let mut stored = self
            .rows
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        *stored = Some(rows.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
