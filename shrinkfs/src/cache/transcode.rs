//! Image transcoding strategies.
//!
//! [`TranscodeCache`](super::TranscodeCache) only deals with bytes in and
//! bytes out; the actual image work sits behind the [`Transcoder`] trait so
//! other formats can be added and tests can count invocations.

use super::types::TranscodeError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::sync::Arc;

/// Cap applied to the larger image dimension, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 2000;

/// JPEG quality used when re-encoding.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Converts the full contents of a source file into artifact bytes.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// dispatcher worker.
pub trait Transcoder: Send + Sync {
    /// Transcode `source` into the bytes stored in the cache.
    ///
    /// # Errors
    ///
    /// Returns `TranscodeError` if the input can't be decoded or the output
    /// can't be encoded.
    fn transcode(&self, source: &[u8]) -> Result<Vec<u8>, TranscodeError>;

    /// Short human-readable name, used in log output.
    fn name(&self) -> &str;
}

impl<T: Transcoder + ?Sized> Transcoder for Arc<T> {
    fn transcode(&self, source: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        (**self).transcode(source)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Decodes a JPEG, scales it down with a Lanczos3 filter so the larger side
/// is at most `max_dimension`, and re-encodes it as JPEG.
///
/// Images already within the cap are re-encoded at their original size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegTranscoder {
    max_dimension: u32,
    quality: u8,
}

impl Default for JpegTranscoder {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl JpegTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the dimension cap. Values below 1 are raised to 1.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    /// Override the JPEG quality, clamped to 1..=100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Output size for a `width` x `height` input.
    ///
    /// The larger side becomes exactly `max_dimension`; the other side is
    /// scaled proportionally and rounded to the nearest pixel (minimum 1).
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let cap = self.max_dimension;
        if width.max(height) <= cap {
            return (width, height);
        }

        let scale = |minor: u32, major: u32| -> u32 {
            let minor = minor as u64;
            let major = major as u64;
            let scaled = (minor * cap as u64 + major / 2) / major;
            scaled.max(1) as u32
        };

        if width >= height {
            (cap, scale(height, width))
        } else {
            (scale(width, height), cap)
        }
    }
}

impl Transcoder for JpegTranscoder {
    fn transcode(&self, source: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let decoded = image::load_from_memory_with_format(source, ImageFormat::Jpeg)
            .map_err(TranscodeError::Decode)?;

        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(TranscodeError::EmptyImage);
        }

        let (target_w, target_h) = self.target_dimensions(width, height);
        let resized = if (target_w, target_h) == (width, height) {
            decoded
        } else {
            decoded.resize_exact(target_w, target_h, FilterType::Lanczos3)
        };

        // The JPEG encoder only accepts 8-bit luma or RGB without alpha.
        let encodable = if resized.color().has_color() {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        } else {
            DynamicImage::ImageLuma8(resized.to_luma8())
        };

        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, self.quality);
        encodable
            .write_with_encoder(encoder)
            .map_err(TranscodeError::Encode)?;

        Ok(out)
    }

    fn name(&self) -> &str {
        "jpeg"
    }
}
