// src/error.rs

//! Error types for loading and analysing simulation traces.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a single analysis case. The batch driver reports them and
/// moves on to the next case.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A required named array is absent from the input container.
    #[error("required array '{name}' not found in {}", .path.display())]
    MissingArray {
        /// Array name that was looked up.
        name: String,
        /// File the lookup was made in.
        path: PathBuf,
    },

    /// A named array exists but holds no samples.
    #[error("array '{0}' is empty")]
    EmptyArray(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The MAT container could not be parsed.
    #[error("failed to parse MAT file: {0}")]
    MatParse(String),

    /// CSV reader failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File extension is neither `.mat` nor `.csv`.
    #[error("unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every LUT shift produced only non-finite errors against the reference.
    #[error("no LUT shift produced a finite error against the reference speed ({estimates} fixed-angle estimates)")]
    NoFiniteShift {
        /// Fixed-angle estimates available for the case.
        estimates: usize,
    },

    /// Not enough Hall edges to run the estimator.
    #[error("insufficient edges: found {found}, need at least {required}")]
    InsufficientEdges {
        /// Edges detected.
        found: usize,
        /// Minimum required.
        required: usize,
    },
}

impl AnalysisError {
    /// Creates a missing array error.
    #[must_use]
    pub fn missing_array(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingArray {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an insufficient edges error.
    #[must_use]
    pub const fn insufficient_edges(found: usize, required: usize) -> Self {
        Self::InsufficientEdges { found, required }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
