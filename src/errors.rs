use std::io;

/// The primary error type for this crate.
#[derive(thiserror::Error, Debug)]
pub enum NeuroxError {
    /// Bad JSON or a missing required configuration field.
    #[error("configuration error: {0}")]
    Config(String),

    /// Inconsistent row widths, a non-numeric field, or an empty dataset file.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Internal dimension mismatch between tensors/slices.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Wrapper for standard I/O errors.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Wrapper for JSON parse errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV read/write errors.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A catch-all for other types of errors.
    #[error("other: {0}")]
    Other(String),
}

/// A specialized `Result` type for this crate, using `NeuroxError`.
pub type NeuroxResult<T> = Result<T, NeuroxError>;
