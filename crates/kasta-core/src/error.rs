//! Error types for schema construction, lookup and attribute validation

use thiserror::Error;

/// Errors raised while building or querying a [`SchemaRegistry`](crate::SchemaRegistry)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown device type: {0}")]
    UnknownType(String),
    #[error("Device type registered twice: {0}")]
    DuplicateType(String),
    #[error("Invalid attribute spec {type_code}.{attribute}: {reason}")]
    InvalidSpec {
        type_code: String,
        attribute: String,
        reason: String,
    },
}

/// A value outside the declared domain of an attribute.
///
/// The `Display` output is the human-readable message shown next to the
/// offending field, so the wording here is part of the public contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{name} must be one of {options}")]
    NotAnOption { name: String, options: String },
    #[error("{name} must be between {min} and {max}")]
    OutOfRange { name: String, min: f64, max: f64 },
    #[error("{name} must be at least {min}")]
    BelowMin { name: String, min: f64 },
    #[error("{name} must be at most {max}")]
    AboveMax { name: String, max: f64 },
    #[error("{name} must be a number")]
    NotANumber { name: String },
    #[error("{name} must be text")]
    NotText { name: String },
    #[error("{name} must be an array")]
    NotAnArray { name: String },
    #[error("{name}[{index}]: malformed entry ({reason})")]
    MalformedEntry {
        name: String,
        index: usize,
        reason: String,
    },
    #[error("{name}[{index}]: {source}")]
    Entry {
        name: String,
        index: usize,
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Name of the attribute (or sub-field) the error refers to
    pub fn attribute(&self) -> &str {
        match self {
            Self::NotAnOption { name, .. }
            | Self::OutOfRange { name, .. }
            | Self::BelowMin { name, .. }
            | Self::AboveMax { name, .. }
            | Self::NotANumber { name }
            | Self::NotText { name }
            | Self::NotAnArray { name }
            | Self::MalformedEntry { name, .. }
            | Self::Entry { name, .. } => name,
        }
    }

    pub(crate) fn not_an_option(name: &str, options: &[i64]) -> Self {
        Self::NotAnOption {
            name: name.to_string(),
            options: join_options(options),
        }
    }

    pub(crate) fn out_of_range(name: &str, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            min,
            max,
        }
    }

    pub(crate) fn in_entry(self, name: &str, index: usize) -> Self {
        Self::Entry {
            name: name.to_string(),
            index,
            source: Box::new(self),
        }
    }
}

/// Option lists render comma-joined without spaces (`0,1,80`)
pub(crate) fn join_options(options: &[i64]) -> String {
    options
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
