//! Error types module
//!
//! All errors are unified under the `AppError` enum: validation-time errors
//! (user-caused, 4xx) and compression/storage-time errors (data or
//! environment-caused, logged per file). Each variant carries enough
//! metadata to pick an HTTP status and a log level at the API boundary.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable per-file issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many files: {0}")]
    TooManyFiles(String),

    #[error("No files uploaded")]
    NoFiles,

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Degenerate resize: {0}")]
    DegenerateResize(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to at the request boundary.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::UnsupportedType(_) => 400,
            AppError::PayloadTooLarge(_) => 413,
            AppError::TooManyFiles(_) => 400,
            AppError::NoFiles => 400,
            AppError::InvalidInput(_) => 400,
            // Compression failures never reach the uploader under the
            // current contract; status is for completeness.
            AppError::Decode(_) | AppError::Encode(_) | AppError::DegenerateResize(_) => 422,
            AppError::Storage(_) => 500,
            AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::TooManyFiles(_) => "TOO_MANY_FILES",
            AppError::NoFiles => "NO_FILES",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::Encode(_) => "ENCODE_ERROR",
            AppError::DegenerateResize(_) => "DEGENERATE_RESIZE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log level for this error.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::UnsupportedType(_)
            | AppError::PayloadTooLarge(_)
            | AppError::TooManyFiles(_)
            | AppError::NoFiles
            | AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::Decode(_) | AppError::Encode(_) | AppError::DegenerateResize(_) => {
                LogLevel::Warn
            }
            AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
