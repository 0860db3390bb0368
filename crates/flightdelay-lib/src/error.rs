use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the flight delay library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Delay model artifact could not be located at the resolved path.
    #[error("delay model artifact not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Raised when the delay model artifact is not valid JSON or does not
    /// match the expected parameter schema.
    #[error("failed to parse delay model artifact: {message}")]
    ModelParse { message: String },

    /// Raised when the artifact does not describe a binary classifier.
    #[error("delay model artifact must list exactly two classes, found {count}")]
    ModelClassCount { count: usize },

    /// Airport mapping file could not be located at the resolved path.
    #[error("airport mapping not found at {path}")]
    AirportsNotFound { path: PathBuf },

    /// Raised when a classifier returns no probability distribution for a
    /// submitted feature row.
    #[error("classifier returned an empty probability distribution")]
    EmptyProbabilities,

    /// Raised when a probability row does not line up with the classifier's
    /// declared class labels.
    #[error("probability row has {columns} columns but classifier lists {classes} classes")]
    ClassColumnMismatch { columns: usize, classes: usize },

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
