//! Loading a user-chosen image file

use super::encode::{encode_jpeg, fit_within, EncodeOptions};
use super::exif;
use super::payload::{ImagePayload, ImageSource};
use crate::error::{Result, ScannerError};
use image::ImageFormat;
use std::path::Path;
use tracing::debug;

/// Formats vision endpoints accept inside a data URL
fn is_transportable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif
    )
}

/// Read an image file into a payload
///
/// The file must decode as an image. PNG, JPEG, WebP and GIF files within
/// `max_dimension` keep their original bytes and format; anything larger,
/// or in another format, is downscaled as needed and re-encoded as JPEG.
///
/// # Errors
/// * `UnreadableFile` - the read failed, or the content is not a decodable image
pub async fn load_from_file(path: &Path, options: &EncodeOptions) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ScannerError::UnreadableFile(format!("{}: {}", path.display(), e)))?;

    let format = image::guess_format(&bytes)
        .map_err(|e| ScannerError::UnreadableFile(format!("{}: {}", path.display(), e)))?;
    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| ScannerError::UnreadableFile(format!("{}: {}", path.display(), e)))?;

    let taken_at = exif::extract_date(&bytes);
    let source = ImageSource::File(path.to_path_buf());

    if is_transportable(format) && decoded.width().max(decoded.height()) <= options.max_dimension {
        debug!(path = %path.display(), bytes = bytes.len() as u64, "image loaded as-is");
        return Ok(ImagePayload {
            mime_type: format.to_mime_type().to_string(),
            width: decoded.width(),
            height: decoded.height(),
            bytes,
            source,
            taken_at,
        });
    }

    let resized = fit_within(decoded, options.max_dimension);
    let encoded = encode_jpeg(&resized, options.jpeg_quality)?;
    debug!(
        path = %path.display(),
        format = ?format,
        original = bytes.len() as u64,
        encoded = encoded.len() as u64,
        width = resized.width(),
        height = resized.height(),
        "image re-encoded"
    );

    Ok(ImagePayload {
        mime_type: "image/jpeg".into(),
        width: resized.width(),
        height: resized.height(),
        bytes: encoded,
        source,
        taken_at,
    })
}
