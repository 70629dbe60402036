//! Shared key generation and filename sanitization.
//!
//! Key format: originals `uploads/{uuid}-{sanitized name}`, derivatives
//! `compress/compress-{stored name}`.

use uuid::Uuid;

/// Namespace for accepted originals.
pub const UPLOADS_DIR: &str = "uploads";

/// Namespace for compressed derivatives.
pub const COMPRESS_DIR: &str = "compress";

const MAX_FILENAME_LENGTH: usize = 255;

/// Generate a collision-safe storage key for an accepted original.
/// Returns (key, stored_name) where stored_name is the uuid-prefixed
/// sanitized filename.
pub fn original_key(id: Uuid, display_name: &str) -> (String, String) {
    let stored_name = format!("{}-{}", id, sanitize_filename(display_name));
    let key = format!("{}/{}", UPLOADS_DIR, stored_name);
    (key, stored_name)
}

/// Generate the storage key for a compressed derivative of a stored name.
pub fn derivative_key(stored_name: &str) -> String {
    format!("{}/compress-{}", COMPRESS_DIR, stored_name)
}

/// Sanitize a client-supplied filename: strip path components, collapse
/// traversal sequences, and replace anything outside `[A-Za-z0-9._-]`.
/// The result never contains `..`, so every sanitized name is a valid
/// storage key. Degenerate names fall back to "file".
pub fn sanitize_filename(filename: &str) -> String {
    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let mut sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", ".");
    }

    let sanitized = sanitized.trim_matches('.').to_string();

    if sanitized.trim().is_empty() {
        return "file".to_string();
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a/b/photo.png"), "photo.png");
    }

    #[test]
    fn sanitize_neutralizes_traversal() {
        assert_eq!(sanitize_filename(".."), "file");
        assert_eq!(sanitize_filename("../../x.png"), "x.png");
    }

    #[test]
    fn sanitize_collapses_interior_dot_runs() {
        assert_eq!(sanitize_filename("a..b.png"), "a.b.png");
        assert_eq!(sanitize_filename("a....b.png"), "a.b.png");
        assert!(!sanitize_filename("weird...name...png").contains(".."));
    }

    #[test]
    fn sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("image.png"), "image.png");
    }

    #[test]
    fn original_key_is_uuid_prefixed() {
        let id = Uuid::new_v4();
        let (key, stored_name) = original_key(id, "cat.png");
        assert_eq!(key, format!("uploads/{}-cat.png", id));
        assert_eq!(stored_name, format!("{}-cat.png", id));
    }

    #[test]
    fn derivative_key_uses_compress_prefix() {
        assert_eq!(derivative_key("abc-cat.png"), "compress/compress-abc-cat.png");
    }
}
