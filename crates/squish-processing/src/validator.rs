//! Upload validation gate
//!
//! Classifies each upload candidate as accepted or rejected before anything
//! touches storage. Pure decision logic: type, size, and batch count checks
//! with no side effects.

use std::path::Path;

use squish_core::AppError;

/// Validation errors for upload candidates
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported type for '{filename}' (allowed: {allowed:?})")]
    UnsupportedType {
        filename: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Too many files: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::UnsupportedType { .. } => AppError::UnsupportedType(err.to_string()),
            ValidationError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::TooManyFiles { .. } => AppError::TooManyFiles(err.to_string()),
            ValidationError::EmptyFile => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Upload candidate validator
///
/// A type token (e.g. "jpeg") accepts a candidate only when BOTH checks
/// pass: the filename extension equals some allowed token, and the declared
/// media type contains some allowed token. A candidate with a matching
/// extension but a mismatching declared type (or vice versa) is rejected.
pub struct UploadValidator {
    max_file_size: usize,
    max_file_count: usize,
    allowed_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, max_file_count: usize, allowed_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            max_file_count,
            allowed_types: allowed_types
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Gate the batch size before any candidate is persisted. A batch over
    /// the limit rejects as a whole; zero files of an otherwise valid batch
    /// are the caller's concern (distinct "no files" response).
    pub fn validate_batch_size(&self, count: usize) -> Result<(), ValidationError> {
        if count > self.max_file_count {
            return Err(ValidationError::TooManyFiles {
                count,
                max: self.max_file_count,
            });
        }
        Ok(())
    }

    /// Gate one candidate: size first, then the type check.
    pub fn validate_candidate(
        &self,
        filename: &str,
        content_type: &str,
        size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(size)?;
        self.validate_type(filename, content_type)?;
        Ok(())
    }

    fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::PayloadTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    fn validate_type(&self, filename: &str, content_type: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let declared = content_type.to_lowercase();

        let extension_ok = self.allowed_types.iter().any(|t| *t == extension);
        let declared_ok = self.allowed_types.iter().any(|t| declared.contains(t));

        if extension_ok && declared_ok {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedType {
                filename: filename.to_string(),
                allowed: self.allowed_types.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(
            2 * 1024 * 1024,
            5,
            vec!["jpeg", "jpg", "png", "pdf", "doc", "docx"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    #[test]
    fn accepts_matching_extension_and_type() {
        let validator = test_validator();
        assert!(validator
            .validate_candidate("photo.png", "image/png", 1024)
            .is_ok());
        assert!(validator
            .validate_candidate("report.pdf", "application/pdf", 1024)
            .is_ok());
    }

    #[test]
    fn accepts_case_insensitive() {
        let validator = test_validator();
        assert!(validator
            .validate_candidate("PHOTO.PNG", "IMAGE/PNG", 1024)
            .is_ok());
    }

    #[test]
    fn rejects_when_only_extension_matches() {
        let validator = test_validator();
        let result = validator.validate_candidate("photo.png", "image/gif", 1024);
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_when_only_declared_type_matches() {
        let validator = test_validator();
        let result = validator.validate_candidate("photo.gif", "image/png", 1024);
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_when_neither_matches() {
        let validator = test_validator();
        let result = validator.validate_candidate("clip.mp4", "video/mp4", 1024);
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_missing_extension() {
        let validator = test_validator();
        let result = validator.validate_candidate("noextension", "image/png", 1024);
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_oversize_file() {
        let validator = test_validator();
        let result = validator.validate_candidate("photo.png", "image/png", 2 * 1024 * 1024 + 1);
        assert!(matches!(
            result,
            Err(ValidationError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn accepts_file_at_exact_limit() {
        let validator = test_validator();
        assert!(validator
            .validate_candidate("photo.png", "image/png", 2 * 1024 * 1024)
            .is_ok());
    }

    #[test]
    fn rejects_empty_file() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_candidate("photo.png", "image/png", 0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn rejects_batch_over_limit() {
        let validator = test_validator();
        assert!(validator.validate_batch_size(5).is_ok());
        assert!(matches!(
            validator.validate_batch_size(6),
            Err(ValidationError::TooManyFiles { count: 6, max: 5 })
        ));
    }

    #[test]
    fn size_check_runs_before_type_check() {
        let validator = test_validator();
        // Oversize AND wrong type: size wins, matching check order.
        let result = validator.validate_candidate("clip.mp4", "video/mp4", 4 * 1024 * 1024);
        assert!(matches!(
            result,
            Err(ValidationError::PayloadTooLarge { .. })
        ));
    }
}
