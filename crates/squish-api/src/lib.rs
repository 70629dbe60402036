//! Squish API
//!
//! HTTP surface for the upload + compression service. Exposed as a library
//! so integration tests can assemble the router against isolated storage.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
