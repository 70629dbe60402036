//! Application state shared across handlers.

use std::sync::Arc;

use squish_core::Config;
use squish_processing::UploadValidator;
use squish_storage::{LocalStorage, Storage};

use crate::services::compression::CompressionSupervisor;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub validator: UploadValidator,
    pub supervisor: CompressionSupervisor,
}

impl AppState {
    /// Build the application state: storage namespaces are created here, so
    /// the output directory exists before any compression run writes to it.
    pub async fn new(config: Config) -> Result<Arc<Self>, anyhow::Error> {
        let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(&config.storage_path).await?);

        let validator = UploadValidator::new(
            config.max_file_size_bytes,
            config.max_files_per_request,
            config.allowed_types.clone(),
        );

        let supervisor = CompressionSupervisor::new(storage.clone(), config.target_size_kb);

        Ok(Arc::new(AppState {
            config,
            storage,
            validator,
            supervisor,
        }))
    }
}
