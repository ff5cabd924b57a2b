//! Error types for the Mayday library.
//!
//! All fallible operations in the pipeline return [`Result`], with the
//! [`MaydayError`] enum describing what went wrong. Malformed input rows
//! carry the offending row id so callers can decide between skipping the
//! row and aborting the run.
//!
//! # Examples
//!
//! ```
//! use mayday::error::{MaydayError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MaydayError::data_format_at(42, "truncated category string"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

fn fmt_row(row: &Option<i64>) -> String {
    match row {
        Some(id) => format!(" (row {id})"),
        None => String::new(),
    }
}

/// The main error type for Mayday operations.
#[derive(Error, Debug)]
pub enum MaydayError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed input data (packed category strings, vocabulary mismatches).
    ///
    /// Carries the offending row id when one is known, so a caller can
    /// choose to skip-and-log instead of aborting.
    #[error("Data format error{}: {}", fmt_row(.row), .message)]
    DataFormat {
        /// Id of the offending input row, if known.
        row: Option<i64>,
        /// Human-readable description of the problem.
        message: String,
    },

    /// The cleaned dataset cannot support training (empty, or otherwise
    /// too small to cross-validate).
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Grid search could not produce a valid candidate.
    #[error("Training error: {0}")]
    Training(String),

    /// Model artifact format mismatch or corrupt payload on load.
    #[error("Artifact version error: {0}")]
    ArtifactVersion(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with MaydayError.
pub type Result<T> = std::result::Result<T, MaydayError>;

impl MaydayError {
    /// Create a data format error with no row context.
    pub fn data_format<S: Into<String>>(msg: S) -> Self {
        MaydayError::DataFormat {
            row: None,
            message: msg.into(),
        }
    }

    /// Create a data format error attributed to a specific input row.
    pub fn data_format_at<S: Into<String>>(row: i64, msg: S) -> Self {
        MaydayError::DataFormat {
            row: Some(row),
            message: msg.into(),
        }
    }

    /// Create a new insufficient data error.
    pub fn insufficient_data<S: Into<String>>(msg: S) -> Self {
        MaydayError::InsufficientData(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        MaydayError::Training(msg.into())
    }

    /// Create a new artifact version error.
    pub fn artifact_version<S: Into<String>>(msg: S) -> Self {
        MaydayError::ArtifactVersion(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        MaydayError::Analysis(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        MaydayError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MaydayError::Other(msg.into())
    }
}
