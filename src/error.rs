//! Error types for tinydb
//!
//! This module defines all error types used throughout the engine.

use thiserror::Error;

/// The main error type for tinydb
#[derive(Error, Debug)]
pub enum Error {
    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' does not exist")]
    TableNotFound(String),

    // ========== Schema Errors ==========
    #[error(
        "Schema error: the number of values in the new row ({found}) does not match \
         the number of '{table}' attributes ({expected})"
    )]
    SchemaMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("Schema error: invalid date '{value}' in column '{column}'")]
    InvalidDate { column: String, value: String },

    #[error("Schema error: invalid date range, start_date ({start}) cannot be later than end_date ({end})")]
    InvalidDateRange { start: String, end: String },

    // ========== Constraint Errors ==========
    #[error("Constraint error: value(s) '{values}' already exist in column(s) ({columns}) of '{table}', which must be unique")]
    UniqueViolation {
        table: String,
        columns: String,
        values: String,
    },

    // ========== Validation Errors ==========
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // ========== Type Errors ==========
    #[error("Type error: the '{operation}' operation cannot be applied to column '{column}' as it contains non-numeric data")]
    NonNumericColumn { operation: String, column: String },

    #[error("Type error: cannot compare {left} with {right}")]
    IncomparableValues { left: String, right: String },

    // ========== Storage Errors ==========
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ========== Config Errors ==========
    #[error("Config error: {0}")]
    Config(String),

    // ========== Shell Errors ==========
    #[error("Command error: {0}")]
    InvalidCommand(String),
}

/// Malformed arguments to the cross-table operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least two tables are required to perform a join")]
    TooFewTables,

    #[error("table '{0}' does not exist")]
    UnknownTable(String),

    #[error("number of join attributes ({found}) must be one less than the number of tables ({tables})")]
    JoinArity { tables: usize, found: usize },

    #[error("join attribute pairs must consist of 2 elements, got {0}")]
    PairShape(usize),

    #[error("join attribute '{0}' must have the format 'table_name.table_attribute'")]
    UnqualifiedAttribute(String),

    #[error("'{attribute}' is not an attribute of table '{table}'")]
    UnknownAttribute { table: String, attribute: String },

    #[error("join attribute '{reference}' must refer to a table joined before '{table}'")]
    DanglingReference { reference: String, table: String },

    #[error("operation '{0}' is not supported")]
    UnknownOperation(String),

    #[error("'{operation}' requires at least one value in column '{column}'")]
    EmptyColumn { operation: String, column: String },

    #[error("selection {selection} is not supported by table '{table}'")]
    UnsupportedSelection { table: String, selection: String },
}

impl Error {
    /// Referenced table name is not registered
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::TableNotFound(_) | Error::Validation(ValidationError::UnknownTable(_))
        )
    }

    /// Row shape or date column rejected
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Error::SchemaMismatch { .. } | Error::InvalidDate { .. } | Error::InvalidDateRange { .. }
        )
    }

    pub fn is_uniqueness(&self) -> bool {
        matches!(self, Error::UniqueViolation { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Error::NonNumericColumn { .. } | Error::IncomparableValues { .. }
        )
    }
}

/// Result type alias for tinydb operations
pub type Result<T> = std::result::Result<T, Error>;
