use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`.
    ///
    /// Both the `uploads/` and `compress/` namespaces are created up front so
    /// concurrent compression runs never race on directory creation.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        for dir in [keys::UPLOADS_DIR, keys::COMPRESS_DIR] {
            let path = base_path.join(dir);
            fs::create_dir_all(&path).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    async fn write_file(&self, path: &Path, data: Vec<u8>) -> StorageResult<usize> {
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(size)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store_original(&self, display_name: &str, data: Vec<u8>) -> StorageResult<StoredFile> {
        let (key, stored_name) = keys::original_key(Uuid::new_v4(), display_name);
        let path = self.key_to_path(&key)?;

        let size = self.write_file(&path, data).await?;

        tracing::info!(
            key = %key,
            original_filename = %display_name,
            size_bytes = size,
            "Stored original upload"
        );

        Ok(StoredFile { key, stored_name })
    }

    async fn store_derivative(&self, stored_name: &str, data: Vec<u8>) -> StorageResult<String> {
        let key = keys::derivative_key(stored_name);
        let path = self.key_to_path(&key)?;

        let size = self.write_file(&path, data).await?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            "Stored compressed derivative"
        );

        Ok(key)
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }
}
