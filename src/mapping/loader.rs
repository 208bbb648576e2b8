//! Loading mapping documents from disk.
//!
//! A document that is absent or malformed is a load-time error; builds
//! never see a partially loaded mapping.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::MappingDocument;

/// Errors that can occur when loading a mapping document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document
    #[error("Invalid mapping document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for mapping loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a mapping document from a JSON file.
pub fn load_mapping(path: &Path) -> LoadResult<MappingDocument> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let contents = fs::read_to_string(path)?;
    MappingDocument::from_json_str(&contents)
}

impl MappingDocument {
    /// Parse a mapping document from JSON text (useful for testing).
    pub fn from_json_str(contents: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}
