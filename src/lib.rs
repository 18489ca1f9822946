//! tinydb - a minimal relational data engine
//!
//! This library provides:
//! - Tables bound to CSV record stores, with attribute-count and uniqueness
//!   constraints and table-specific selections
//! - A table registry with chain equality joins and column aggregation
//! - Configuration for the standard employee/department/project tables
//! - A line-oriented shell driving the registry

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod shell;
pub mod storage;
pub mod table;

pub use catalog::Database;
pub use config::DatabaseConfig;
pub use error::{Error, Result};
