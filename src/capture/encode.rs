//! JPEG encoding and downscaling

use crate::error::{Result, ScannerError};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

/// Limits applied when a picked file is turned into a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Longest side in pixels; larger images are downscaled
    pub max_dimension: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_dimension: 2048,
            jpeg_quality: 85,
        }
    }
}

/// Encode as JPEG, dropping any alpha channel
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| ScannerError::Io(std::io::Error::other(e.to_string())))?;
    Ok(buffer)
}

/// Shrink so the longest side is at most `max_dimension`, keeping aspect ratio
pub fn fit_within(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width().max(image.height()) <= max_dimension {
        return image;
    }
    image.resize(max_dimension, max_dimension, FilterType::Triangle)
}
