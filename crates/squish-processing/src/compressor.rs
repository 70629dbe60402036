//! Adaptive image compressor
//!
//! Given a decodable raster image and a target size in kilobytes, searches
//! quality/dimension space for a JPEG encoding at or below the target.
//! Quality reduction is cheap and tried every round; dimension reduction is
//! reserved for attempts still more than twice the target, since resampling
//! is more visually destructive.
//!
//! The search runs against the `RasterCodec` trait so the loop can be tested
//! with a synthetic encoder; `JpegCodec` is the production implementation.
//! The source is decoded exactly once per run and its dimensions reused
//! across attempts.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use squish_core::AppError;

/// Starting quality on the 1-100 scale.
const INITIAL_QUALITY: u8 = 80;

/// Quality reduction per attempt.
const QUALITY_STEP: u8 = 5;

/// Quality floor: the loop exits here even above target (best effort).
const QUALITY_FLOOR: u8 = 10;

/// Linear dimension shrink applied when an attempt is more than twice the
/// target size.
const SCALE_STEP: f32 = 0.1;

/// Compression errors
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    #[error("Failed to decode source image: {0}")]
    Decode(String),

    #[error("Failed to encode attempt: {0}")]
    Encode(String),

    #[error("Degenerate resize: scale factor {scale} drives {width}x{height} below one pixel")]
    DegenerateResize { scale: f32, width: u32, height: u32 },
}

impl From<CompressError> for AppError {
    fn from(err: CompressError) -> Self {
        match &err {
            CompressError::Decode(_) => AppError::Decode(err.to_string()),
            CompressError::Encode(_) => AppError::Encode(err.to_string()),
            CompressError::DegenerateResize { .. } => AppError::DegenerateResize(err.to_string()),
        }
    }
}

/// Decode-once view of a raster source: original dimensions plus the ability
/// to re-encode at arbitrary dimensions and quality.
pub trait RasterCodec {
    /// Original pixel dimensions of the source.
    fn dimensions(&self) -> (u32, u32);

    /// Encode the source at the given dimensions and quality.
    fn encode(&self, width: u32, height: u32, quality: u8) -> Result<Vec<u8>, CompressError>;
}

/// Result of one search run. The last attempt's buffer becomes the artifact
/// regardless of whether the target was met.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Final encoded bytes.
    pub bytes: Vec<u8>,
    /// Quality of the final attempt.
    pub quality: u8,
    /// Scale factor of the final attempt.
    pub scale_factor: f32,
    /// Total encode attempts, including the initial one.
    pub attempts: u32,
}

impl SearchOutcome {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the final attempt made the size budget.
    pub fn met_target(&self, target_kb: u64) -> bool {
        !above_target(&self.bytes, target_kb)
    }
}

/// Fractional-kilobyte comparison against the target.
fn above_target(encoded: &[u8], target_kb: u64) -> bool {
    encoded.len() as f64 / 1024.0 > target_kb as f64
}

/// Iterative quality/dimension search.
///
/// Starts at quality 80 and full dimensions. While the attempt is above
/// target and quality is above the floor: shrink both dimensions by 10% of
/// the original when the attempt is still more than twice the target, drop
/// quality by 5, re-encode. Bounded by the quality floor (at most 14
/// decrements from 80 to 10), so it always terminates. Encoded size is
/// non-increasing across attempts in expectation, though not guaranteed for
/// every pathological image.
pub fn search(codec: &dyn RasterCodec, target_kb: u64) -> Result<SearchOutcome, CompressError> {
    let (orig_width, orig_height) = codec.dimensions();

    let mut quality = INITIAL_QUALITY;
    let mut scale_factor: f32 = 1.0;
    let mut attempts: u32 = 1;
    let mut encoded = codec.encode(orig_width, orig_height, quality)?;

    while above_target(&encoded, target_kb) && quality > QUALITY_FLOOR {
        if encoded.len() as f64 / 1024.0 > (target_kb * 2) as f64 {
            scale_factor -= SCALE_STEP;
        }
        quality -= QUALITY_STEP;

        let width = (orig_width as f32 * scale_factor).round() as i64;
        let height = (orig_height as f32 * scale_factor).round() as i64;
        if width < 1 || height < 1 {
            return Err(CompressError::DegenerateResize {
                scale: scale_factor,
                width: orig_width,
                height: orig_height,
            });
        }

        encoded = codec.encode(width as u32, height as u32, quality)?;
        attempts += 1;

        tracing::trace!(
            attempt = attempts,
            quality = quality,
            scale_factor = scale_factor,
            size_bytes = encoded.len(),
            "Compression attempt"
        );
    }

    Ok(SearchOutcome {
        bytes: encoded,
        quality,
        scale_factor,
        attempts,
    })
}

/// Production codec: decodes the source once and re-encodes to JPEG.
pub struct JpegCodec {
    img: DynamicImage,
}

impl JpegCodec {
    /// Decode source bytes, guessing the container format from content.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CompressError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CompressError::Decode(e.to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| CompressError::Decode(e.to_string()))?;
        Ok(JpegCodec { img })
    }
}

impl RasterCodec for JpegCodec {
    fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    fn encode(&self, width: u32, height: u32, quality: u8) -> Result<Vec<u8>, CompressError> {
        // JPEG has no alpha; flatten to RGB before encoding.
        let rgb = if (width, height) == self.img.dimensions() {
            self.img.to_rgb8()
        } else {
            self.img
                .resize_exact(width, height, FilterType::Lanczos3)
                .to_rgb8()
        };

        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CompressError::Encode(e.to_string()))?;

        Ok(buffer)
    }
}

/// Decode `data` and run the search against it.
pub fn compress_image(data: &[u8], target_kb: u64) -> Result<SearchOutcome, CompressError> {
    let codec = JpegCodec::from_bytes(data)?;
    search(&codec, target_kb)
}
