use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the nuggets-media library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Caller supplied a value with the wrong structural type
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Key-value store used while closed, or its backing file is unusable
    #[error("Store error: {0}")]
    Store(String),

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}
