//! Upload handler
//!
//! Extract the batch from the multipart request, gate it (count, then
//! per-file size and type), persist accepted files, and kick off one
//! compression run per persisted image. The success response goes out as
//! soon as files are persisted; compression completes in the background
//! unless the await-compression policy is enabled.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use squish_core::{constants, AppError};
use squish_storage::StoredFile;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Extensions the compressor is dispatched for. Non-image uploads (pdf,
/// doc, docx) are persisted but never compressed.
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
}

/// One inbound file, alive only for the duration of the request.
struct UploadCandidate {
    filename: String,
    content_type: String,
    data: Bytes,
}

/// Handle `POST /upload`.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let candidates = extract_candidates(multipart).await?;

    if candidates.is_empty() {
        return Err(AppError::NoFiles.into());
    }

    // Batch gate first: an oversized batch is rejected before any file is
    // validated or stored.
    state
        .validator
        .validate_batch_size(candidates.len())
        .map_err(AppError::from)?;

    // Validate every candidate before storing any, so a rejected sibling
    // never leaves a partial batch behind.
    for candidate in &candidates {
        state
            .validator
            .validate_candidate(&candidate.filename, &candidate.content_type, candidate.data.len())
            .map_err(AppError::from)?;
    }

    let accepted = candidates.len();
    let mut compression_jobs: Vec<StoredFile> = Vec::new();

    for candidate in candidates {
        let stored = state
            .storage
            .store_original(&candidate.filename, candidate.data.to_vec())
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if is_image(&candidate.filename) {
            compression_jobs.push(stored);
        }
    }

    tracing::info!(
        accepted = accepted,
        images = compression_jobs.len(),
        "Upload batch persisted"
    );

    if state.config.await_compression {
        state.supervisor.run_to_completion(compression_jobs).await;
    } else {
        state.supervisor.dispatch(compression_jobs);
    }

    Ok(Json(UploadResponse {
        message: "Files compressed successfully".to_string(),
    }))
}

/// Drain every part of the upload field into candidates. Parts under other
/// field names are ignored.
async fn extract_candidates(mut multipart: Multipart) -> Result<Vec<UploadCandidate>, AppError> {
    let mut candidates = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if field_name != constants::UPLOAD_FIELD_NAME {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        candidates.push(UploadCandidate {
            filename,
            content_type,
            data,
        });
    }

    Ok(candidates)
}

fn is_image(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_detection_by_extension() {
        assert!(is_image("photo.png"));
        assert!(is_image("photo.JPG"));
        assert!(is_image("photo.jpeg"));
        assert!(!is_image("report.pdf"));
        assert!(!is_image("notes.docx"));
        assert!(!is_image("noextension"));
    }
}
