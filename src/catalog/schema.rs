//! Schema definitions for tinydb
//!
//! This module defines table schemas and their uniqueness constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Row;

/// Uniqueness constraint over one attribute or a combination of attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniqueConstraint {
    /// No two rows may share a value in this attribute
    Single(String),
    /// No two rows may share the values of all these attributes at once
    Composite(Vec<String>),
}

impl UniqueConstraint {
    pub fn single(attr: impl Into<String>) -> Self {
        UniqueConstraint::Single(attr.into())
    }

    pub fn composite<I, S>(attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        UniqueConstraint::Composite(attrs.into_iter().map(Into::into).collect())
    }

    /// Attributes covered by this constraint
    pub fn attrs(&self) -> &[String] {
        match self {
            UniqueConstraint::Single(attr) => std::slice::from_ref(attr),
            UniqueConstraint::Composite(attrs) => attrs,
        }
    }

    /// Does `existing` collide with `candidate` under this constraint?
    pub fn conflicts(&self, existing: &Row, candidate: &Row) -> bool {
        self.attrs()
            .iter()
            .all(|attr| existing.get(attr) == candidate.get(attr))
    }
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attrs().join(", "))
    }
}

/// Table schema - ordered attributes plus uniqueness constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attrs: Vec<String>,
    unique: Vec<UniqueConstraint>,
}

impl Schema {
    /// Create a schema from attribute names, without constraints
    pub fn new<I, S>(attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attrs: attrs.into_iter().map(Into::into).collect(),
            unique: Vec::new(),
        }
    }

    /// Add a uniqueness constraint
    pub fn unique(mut self, constraint: UniqueConstraint) -> Self {
        self.unique.push(constraint);
        self
    }

    /// Attribute names in order
    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }

    pub fn unique_constraints(&self) -> &[UniqueConstraint] {
        &self.unique
    }

    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a == name)
    }

    /// Zip positional values against the attributes.
    ///
    /// Surplus values or attributes are dropped by the zip, so callers compare
    /// `values.len()` with `attr_count()` to detect a shape mismatch.
    pub fn zip_row<'a, I>(&self, values: I) -> Row
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.attrs
            .iter()
            .cloned()
            .zip(values.into_iter().map(str::to_string))
            .collect()
    }
}
