//! Error types for statement compilation.
//!
//! Structural problems with the request or the mapping document abort the
//! whole build; no partial statement is ever returned. Unsupported filter
//! types are the one lenient case and are handled inside the filter
//! compiler (skip plus diagnostic), so they never appear here.

use std::fmt;

/// Result type for statement compilation.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that abort a build.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The request cannot produce a statement (e.g. no fields).
    InvalidRequest(String),

    /// A requested logical field has no entry in the mapping document.
    UnmappedField(String),

    /// A field's mapping entry is missing required join settings.
    IncompleteFieldMapping { field: String, message: String },

    /// A join dependency cannot be resolved; the mapping document is
    /// corrupt or incomplete.
    InconsistentMapping(String),

    /// A range bound cannot be interpreted as a date.
    DateParse { value: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidRequest(message) => {
                write!(f, "Invalid request: {}", message)
            }
            BuildError::UnmappedField(field) => {
                write!(f, "No mapping found for field '{}'", field)
            }
            BuildError::IncompleteFieldMapping { field, message } => {
                write!(f, "Incomplete mapping for field '{}': {}", field, message)
            }
            BuildError::InconsistentMapping(message) => {
                write!(f, "Inconsistent mapping: {}", message)
            }
            BuildError::DateParse { value } => {
                write!(f, "Cannot interpret '{}' as a date", value)
            }
        }
    }
}

impl std::error::Error for BuildError {}
