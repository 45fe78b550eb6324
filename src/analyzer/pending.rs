//! Pending capture store
//!
//! When an analysis attempt fails, the image is kept so `retry` can send
//! it again without a new capture. A successful analysis clears it. Only
//! the most recent failed capture is kept.

use crate::capture::{ImagePayload, ImageSource};
use crate::error::{Result, ScannerError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PENDING_FILE_NAME: &str = "pending-capture.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCapture {
    /// Format version (compatibility check)
    version: u32,
    pub saved_at: String,
    pub mime_type: String,
    /// Base64 image body
    data: String,
    pub width: u32,
    pub height: u32,
    pub source: ImageSource,
    pub taken_at: Option<String>,
    /// Category of the error that made the attempt fail
    pub last_error: String,
}

impl PendingCapture {
    const CURRENT_VERSION: u32 = 1;

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(PENDING_FILE_NAME)
    }

    pub fn new(payload: &ImagePayload, error: &ScannerError) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            saved_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            mime_type: payload.mime_type.clone(),
            data: payload.to_base64(),
            width: payload.width,
            height: payload.height,
            source: payload.source.clone(),
            taken_at: payload.taken_at.clone(),
            last_error: error.category().to_string(),
        }
    }

    /// Keep the payload of a failed attempt
    pub fn save(dir: &Path, payload: &ImagePayload, error: &ScannerError) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let pending = Self::new(payload, error);
        let file = File::create(Self::path(dir))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &pending)?;
        debug!(dir = %dir.display(), category = %pending.last_error, "pending capture saved");
        Ok(pending)
    }

    /// Read the pending capture; a missing, unreadable or outdated file is `None`
    pub fn load(dir: &Path) -> Option<Self> {
        let path = Self::path(dir);
        if !path.exists() {
            return None;
        }

        let file = File::open(&path).ok()?;
        match serde_json::from_reader::<_, PendingCapture>(BufReader::new(file)) {
            Ok(pending) if pending.version == Self::CURRENT_VERSION => Some(pending),
            Ok(pending) => {
                warn!(version = pending.version, "pending capture version mismatch, ignoring");
                None
            }
            Err(e) => {
                warn!(error = %e, "pending capture unreadable, ignoring");
                None
            }
        }
    }

    /// Remove the pending capture; `Ok(false)` when there was none
    pub fn clear(dir: &Path) -> Result<bool> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    /// Keep the payload after a failed analysis; `true` when it was stored
    ///
    /// Only analysis failures are kept. A missing cache directory or a
    /// failed write is logged and reported as `false`.
    pub fn keep_after_failure(dir: Result<PathBuf>, payload: &ImagePayload, error: &ScannerError) -> bool {
        if !error.is_analysis_failure() {
            return false;
        }
        match dir.and_then(|dir| Self::save(&dir, payload, error)) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "could not keep the photo for retry");
                false
            }
        }
    }

    /// Drop the pending capture after a successful analysis; failures are only logged
    pub fn discard_after_success(dir: Result<PathBuf>) {
        if let Err(e) = dir.and_then(|dir| Self::clear(&dir)) {
            warn!(error = %e, "could not clear the pending capture");
        }
    }

    /// Rebuild the image payload
    pub fn payload(&self) -> Result<ImagePayload> {
        let bytes = STANDARD
            .decode(&self.data)
            .map_err(|e| ScannerError::UnreadableFile(format!("pending capture: {}", e)))?;
        Ok(ImagePayload {
            mime_type: self.mime_type.clone(),
            bytes,
            width: self.width,
            height: self.height,
            source: self.source.clone(),
            taken_at: self.taken_at.clone(),
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}
