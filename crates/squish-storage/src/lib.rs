//! Squish Storage Library
//!
//! Storage abstraction and the local filesystem implementation.
//!
//! # Storage key format
//!
//! Accepted originals live under the `uploads/` namespace as
//! `uploads/{uuid}-{sanitized filename}`; compressed derivatives live under
//! `compress/` as `compress/compress-{stored name}`. Keys must not contain
//! `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so callers stay consistent.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::{derivative_key, original_key, sanitize_filename};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredFile};
