//! Storage module
//!
//! This module contains the row representation and the record stores
//! tables persist themselves through:
//! - CSV record codec
//! - File-backed and in-memory record stores

pub mod csv;
pub mod store;

pub use store::{CsvFileStore, MemoryStore, RecordStore};

use indexmap::IndexMap;

/// A single table row: attribute name to text value, in schema order
pub type Row = IndexMap<String, String>;
