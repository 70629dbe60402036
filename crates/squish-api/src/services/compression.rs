//! Compression task supervision
//!
//! One task per accepted image. Runs are independent: each owns its buffers
//! and writes exactly one derivative. Outcomes always flow back through the
//! `JoinSet` so every per-file result is observed and logged, even in the
//! default fire-and-forget mode where the HTTP response has already gone out.

use std::sync::Arc;

use squish_core::AppError;
use squish_processing::compressor::compress_image;
use squish_storage::{Storage, StoredFile};
use tokio::task::{JoinError, JoinSet};

/// Outcome of one successful compression run.
#[derive(Debug, Clone)]
pub struct CompressionReport {
    pub source_key: String,
    pub artifact_key: String,
    pub quality: u8,
    pub scale_factor: f32,
    pub size_bytes: usize,
    pub attempts: u32,
}

#[derive(Clone)]
pub struct CompressionSupervisor {
    storage: Arc<dyn Storage>,
    target_kb: u64,
}

impl CompressionSupervisor {
    pub fn new(storage: Arc<dyn Storage>, target_kb: u64) -> Self {
        Self { storage, target_kb }
    }

    /// Spawn one task per file and hand back the set of pending results.
    pub fn spawn_batch(&self, files: Vec<StoredFile>) -> JoinSet<Result<CompressionReport, AppError>> {
        let mut set = JoinSet::new();
        for file in files {
            let storage = self.storage.clone();
            let target_kb = self.target_kb;
            set.spawn(async move { compress_one(storage, file, target_kb).await });
        }
        set
    }

    /// Fire-and-forget mode: a detached collector drains the set and logs
    /// each outcome after the response has been sent.
    pub fn dispatch(&self, files: Vec<StoredFile>) {
        if files.is_empty() {
            return;
        }
        let mut set = self.spawn_batch(files);
        tokio::spawn(async move {
            while let Some(result) = set.join_next().await {
                log_outcome(result);
            }
        });
    }

    /// Awaited mode: drain the whole batch before returning. Failures are
    /// logged and collected; one file's failure never aborts its siblings.
    pub async fn run_to_completion(
        &self,
        files: Vec<StoredFile>,
    ) -> Vec<Result<CompressionReport, AppError>> {
        let mut set = self.spawn_batch(files);
        let mut outcomes = Vec::new();
        while let Some(result) = set.join_next().await {
            let outcome = flatten_join(result);
            log_result(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn flatten_join(
    result: Result<Result<CompressionReport, AppError>, JoinError>,
) -> Result<CompressionReport, AppError> {
    match result {
        Ok(outcome) => outcome,
        Err(e) => Err(AppError::Internal(format!(
            "Compression task panicked: {}",
            e
        ))),
    }
}

async fn compress_one(
    storage: Arc<dyn Storage>,
    file: StoredFile,
    target_kb: u64,
) -> Result<CompressionReport, AppError> {
    let data = storage
        .read(&file.key)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    // The search is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || compress_image(&data, target_kb))
        .await
        .map_err(|e| AppError::Internal(format!("Compression task join error: {}", e)))??;

    let quality = outcome.quality;
    let scale_factor = outcome.scale_factor;
    let size_bytes = outcome.size_bytes();
    let attempts = outcome.attempts;

    let artifact_key = storage
        .store_derivative(&file.stored_name, outcome.bytes)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(CompressionReport {
        source_key: file.key,
        artifact_key,
        quality,
        scale_factor,
        size_bytes,
        attempts,
    })
}

fn log_outcome(result: Result<Result<CompressionReport, AppError>, JoinError>) {
    log_result(&flatten_join(result));
}

fn log_result(outcome: &Result<CompressionReport, AppError>) {
    match outcome {
        Ok(report) => {
            tracing::info!(
                source_key = %report.source_key,
                artifact_key = %report.artifact_key,
                quality = report.quality,
                scale_factor = report.scale_factor,
                size_bytes = report.size_bytes,
                attempts = report.attempts,
                "Compression run finished"
            );
        }
        Err(error) => {
            tracing::warn!(error = %error, code = error.error_code(), "Compression run failed");
        }
    }
}
