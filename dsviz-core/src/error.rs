//! Structured error types for dsviz-core.
//!
//! Game transitions never fail; these errors only come from the edges
//! (config files, maze layouts, serialization). The `dsviz` binary wraps
//! them in `anyhow` for context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dsviz-core operations
#[derive(Error, Debug)]
pub enum DsvizError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file could not be parsed
    #[error("Invalid TOML in {path:?}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be serialized back to TOML
    #[error("Failed to serialize config: {source}")]
    TomlSerialize {
        #[from]
        source: toml::ser::Error,
    },

    /// JSON serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Configuration value out of range
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Maze layout could not be parsed
    #[error("Invalid maze layout at row {row}, column {col}: {reason}")]
    InvalidLayout {
        row: usize,
        col: usize,
        reason: String,
    },
}

/// Result type alias for dsviz-core operations
pub type Result<T> = std::result::Result<T, DsvizError>;

impl DsvizError {
    /// Create a TOML parse error for a file
    pub fn toml_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::TomlParse {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a layout error pointing at a cell
    pub fn invalid_layout(row: usize, col: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            row,
            col,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DsvizError::config("hash.buckets must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: hash.buckets must be at least 1"
        );

        let err = DsvizError::invalid_layout(2, 3, "unknown cell 'Z'");
        assert!(err.to_string().contains("row 2, column 3"));
        assert!(err.to_string().contains("unknown cell 'Z'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: DsvizError = io_err.into();

        assert!(matches!(err, DsvizError::Io { .. }));
    }
}
