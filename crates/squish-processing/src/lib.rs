//! Squish Processing Library
//!
//! The two decision-making components of the service: the validation gate
//! applied to every upload candidate before storage, and the adaptive
//! compressor that searches quality/dimension space for an encoding at or
//! below a target size.

pub mod compressor;
pub mod validator;

pub use compressor::{
    compress_image, search, CompressError, JpegCodec, RasterCodec, SearchOutcome,
};
pub use validator::{UploadValidator, ValidationError};
