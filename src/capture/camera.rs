//! Camera stream acquisition and frame capture
//!
//! `MediaDevices` and `VideoTrack` are the platform seam. A `CameraStream`
//! owns the tracks it was given and stops them when released or dropped,
//! so every exit path gives the hardware back.

use super::encode::encode_jpeg;
use super::payload::{ImagePayload, ImageSource};
use crate::error::{Result, ScannerError};
use async_trait::async_trait;
use clap::ValueEnum;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Front,
    /// Rear camera, the default for photographing a plate
    #[default]
    Back,
}

impl Facing {
    /// Media-capture facing mode name
    pub fn facing_mode(&self) -> &'static str {
        match self {
            Facing::Front => "user",
            Facing::Back => "environment",
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

/// Permission-gated access to camera hardware
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Fails with `PermissionDenied` or `DeviceUnavailable`
    async fn get_user_media(&self, facing: Facing) -> Result<Vec<Box<dyn VideoTrack>>>;
}

/// One live video track
#[async_trait]
pub trait VideoTrack: Send {
    fn is_live(&self) -> bool;

    /// Current frame, or `None` while the track has nothing to show yet
    async fn grab_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Release the hardware. Called at most once per track by `CameraStream`.
    fn stop(&mut self);
}

pub struct CameraStream {
    facing: Facing,
    tracks: Vec<Box<dyn VideoTrack>>,
    jpeg_quality: u8,
    released: bool,
}

/// Request camera access and wrap the granted tracks in a scoped stream
pub async fn acquire_camera_stream(
    devices: &dyn MediaDevices,
    facing: Facing,
    jpeg_quality: u8,
) -> Result<CameraStream> {
    let tracks = devices.get_user_media(facing).await?;
    if tracks.is_empty() {
        return Err(ScannerError::DeviceUnavailable(format!(
            "no video track for facing mode {}",
            facing.facing_mode()
        )));
    }

    info!(%facing, tracks = tracks.len() as u64, "camera stream acquired");
    Ok(CameraStream {
        facing,
        tracks,
        jpeg_quality,
        released: false,
    })
}

impl CameraStream {
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Snapshot the current frame at native resolution as JPEG
    ///
    /// The stream stays open; the caller decides when to release it.
    pub async fn capture_frame(&mut self) -> Result<ImagePayload> {
        if self.released {
            return Err(ScannerError::StreamNotReady);
        }

        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.is_live())
            .ok_or(ScannerError::StreamNotReady)?;

        let frame = track.grab_frame().await?.ok_or(ScannerError::StreamNotReady)?;
        if frame.width() == 0 || frame.height() == 0 {
            return Err(ScannerError::StreamNotReady);
        }

        let (width, height) = frame.dimensions();
        let bytes = encode_jpeg(&DynamicImage::ImageRgb8(frame), self.jpeg_quality)?;
        debug!(width, height, bytes = bytes.len() as u64, "frame captured");

        Ok(ImagePayload {
            mime_type: "image/jpeg".into(),
            bytes,
            width,
            height,
            source: ImageSource::Camera(self.facing),
            taken_at: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        })
    }

    /// Stop every track. Safe to call repeatedly.
    pub fn release(&mut self) {
        for track in self.tracks.iter_mut().filter(|t| t.is_live()) {
            track.stop();
        }
        if !self.released {
            debug!(facing = %self.facing, "camera stream released");
        }
        self.released = true;
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.release();
    }
}
