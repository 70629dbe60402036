//! Squish Core Library
//!
//! Shared configuration, error types, and constants used by the storage,
//! processing, and API crates.

pub mod config;
pub mod constants;
pub mod error;

pub use config::Config;
pub use error::{AppError, LogLevel};
