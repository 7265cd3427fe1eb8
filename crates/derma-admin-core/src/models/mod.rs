//! Domain models for the clinic dashboard.

mod employee;
mod patient;
mod prescription;

pub use employee::*;
pub use patient::*;
pub use prescription::*;

use thiserror::Error;

/// Anything held in a [`Collection`](crate::store::Collection) by identifier.
pub trait Entity {
    /// Opaque unique identifier.
    fn id(&self) -> &str;
}

/// Error parsing an enum from its wire name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Trim an optional free-text field, mapping blank to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
