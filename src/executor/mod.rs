//! Query execution module
//!
//! This module contains the cross-table operations: the chain equality join
//! and column aggregation, plus the typed values aggregation works on.

pub mod aggregate;
pub mod join;
pub mod value;

pub use aggregate::{AggregateOp, AggregateResult};
pub use value::Value;
