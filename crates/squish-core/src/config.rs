//! Configuration module
//!
//! Environment-driven configuration, read once at startup. Every knob has a
//! default so the service runs with no environment at all.

use std::env;

use crate::constants;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Listen port (`PORT`, default 3000).
    pub server_port: u16,
    /// Base directory for the uploads/ and compress/ namespaces
    /// (`STORAGE_PATH`, default ".").
    pub storage_path: String,
    /// Directory served as static assets (`PUBLIC_DIR`, default "public").
    pub public_dir: String,
    /// Size budget for compressed derivatives in KB (`TARGET_SIZE_KB`).
    pub target_size_kb: u64,
    /// Per-file upload limit in bytes (`MAX_FILE_SIZE_BYTES`).
    pub max_file_size_bytes: usize,
    /// Per-request file count limit (`MAX_FILES_PER_REQUEST`).
    pub max_files_per_request: usize,
    /// Allowed type tokens (`ALLOWED_TYPES`, comma-separated).
    pub allowed_types: Vec<String>,
    /// When true, the upload response waits for the compression batch to
    /// finish instead of answering as soon as files are persisted
    /// (`AWAIT_COMPRESSION`, default false).
    pub await_compression: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: constants::DEFAULT_PORT,
            storage_path: ".".to_string(),
            public_dir: "public".to_string(),
            target_size_kb: constants::DEFAULT_TARGET_SIZE_KB,
            max_file_size_bytes: constants::DEFAULT_MAX_FILE_SIZE_BYTES,
            max_files_per_request: constants::DEFAULT_MAX_FILES_PER_REQUEST,
            allowed_types: constants::DEFAULT_ALLOWED_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            await_compression: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; real environment wins.
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            server_port: parse_var("PORT", defaults.server_port)?,
            storage_path: env::var("STORAGE_PATH").unwrap_or(defaults.storage_path),
            public_dir: env::var("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            target_size_kb: parse_var("TARGET_SIZE_KB", defaults.target_size_kb)?,
            max_file_size_bytes: parse_var("MAX_FILE_SIZE_BYTES", defaults.max_file_size_bytes)?,
            max_files_per_request: parse_var(
                "MAX_FILES_PER_REQUEST",
                defaults.max_files_per_request,
            )?,
            allowed_types: env::var("ALLOWED_TYPES")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.allowed_types),
            await_compression: env::var("AWAIT_COMPRESSION")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.await_compression),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.target_size_kb == 0 {
            anyhow::bail!("TARGET_SIZE_KB must be greater than zero");
        }
        if self.max_file_size_bytes == 0 {
            anyhow::bail!("MAX_FILE_SIZE_BYTES must be greater than zero");
        }
        if self.max_files_per_request == 0 {
            anyhow::bail!("MAX_FILES_PER_REQUEST must be greater than zero");
        }
        if self.allowed_types.is_empty() {
            anyhow::bail!("ALLOWED_TYPES must not be empty");
        }
        Ok(())
    }

    /// Largest request body the server should accept: every file at the
    /// per-file limit, plus slack for multipart framing.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_file_size_bytes * self.max_files_per_request + 64 * 1024
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
