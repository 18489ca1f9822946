//! Catalog module
//!
//! This module contains the table registry and schema definitions.

pub mod database;
pub mod schema;

pub use database::Database;
pub use schema::{Schema, UniqueConstraint};
