//! Process-wide constants and defaults.

/// Multipart field name carrying uploaded files.
pub const UPLOAD_FIELD_NAME: &str = "files";

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Per-file upload size limit in bytes (2 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 2 * 1024 * 1024;

/// Maximum number of files accepted in a single request.
pub const DEFAULT_MAX_FILES_PER_REQUEST: usize = 5;

/// Default size budget for compressed derivatives, in kilobytes.
pub const DEFAULT_TARGET_SIZE_KB: u64 = 20;

/// Type tokens accepted by the validation gate. Each token is matched
/// case-insensitively against the filename extension (exact) and the
/// declared media type (containment).
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &["jpeg", "jpg", "png", "pdf", "doc", "docx"];
