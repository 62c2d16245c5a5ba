//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, transforming or writing a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Invalid trace format: {0}")]
    Format(String),

    #[error("Invalid trace format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No `{category}` events to infer the main thread from")]
    EmptyTrace { category: String },

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TraceError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TraceError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the input bytes are not a usable trace
    pub fn is_format_error(&self) -> bool {
        matches!(self, TraceError::Format(_) | TraceError::Json(_))
    }
}

/// Errors in user-supplied configuration, raised before any file I/O
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid thread id list '{0}': expected 'auto' or comma-separated integers")]
    InvalidThreadList(String),

    #[error("{0} cannot be empty")]
    EmptySetting(&'static str),

    #[error("Worker count must be at least 1 (got {0})")]
    InvalidJobs(usize),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
