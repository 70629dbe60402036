//! Storage abstraction trait
//!
//! This module defines the Storage trait the upload pipeline and the
//! compression supervisor work against, so neither couples to filesystem
//! details.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted file: its storage key plus the display name it was stored
/// under (uuid-prefixed sanitized original name).
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub key: String,
    pub stored_name: String,
}

/// Storage abstraction trait
///
/// Originals are written once and never mutated; derivatives are written
/// exactly once per compression run. Key layout is described in the crate
/// root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist an accepted original under a collision-safe key derived from
    /// its display name. Returns the stored file reference.
    async fn store_original(&self, display_name: &str, data: Vec<u8>) -> StorageResult<StoredFile>;

    /// Persist a compressed derivative for the given stored name. Returns
    /// the derivative's storage key.
    async fn store_derivative(&self, stored_name: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Read a file by its storage key.
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;
}
