//! Encoded still image ready for transmission

use super::camera::Facing;
use crate::error::{Result, ScannerError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Where a payload came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    Camera(Facing),
    File(PathBuf),
    DataUrl,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Camera(facing) => write!(f, "camera ({})", facing),
            ImageSource::File(path) => write!(f, "{}", path.display()),
            ImageSource::DataUrl => write!(f, "data url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub source: ImageSource,
    /// EXIF DateTimeOriginal for files, capture time for camera frames
    pub taken_at: Option<String>,
}

impl ImagePayload {
    /// Base64 body without the `data:` prefix
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<body>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Rebuild a payload from a data URL
    ///
    /// The MIME type must be an image type and the body must decode to an
    /// image; anything else is `UnreadableFile`.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let (header, body) = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(|| ScannerError::UnreadableFile("not a data URL".into()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ScannerError::UnreadableFile("data URL is not base64 encoded".into()))?;
        if !mime_type.starts_with("image/") {
            return Err(ScannerError::UnreadableFile(format!(
                "unsupported MIME type: {}",
                mime_type
            )));
        }

        let bytes = STANDARD
            .decode(body.trim())
            .map_err(|e| ScannerError::UnreadableFile(format!("invalid base64: {}", e)))?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| ScannerError::UnreadableFile(e.to_string()))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            width: image.width(),
            height: image.height(),
            bytes,
            source: ImageSource::DataUrl,
            taken_at: None,
        })
    }

    /// SHA-256 of the encoded bytes, hex
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
