//! Camera backend driven by an external frame grabber
//!
//! Opening the device node is the permission check: a missing node is
//! `DeviceUnavailable`, an access error is `PermissionDenied`. The node
//! stays open for the life of the track; each frame is produced by running
//! the configured program (ffmpeg by default) and decoding its stdout.

use super::camera::{Facing, MediaDevices, VideoTrack};
use crate::error::{Result, ScannerError};
use async_trait::async_trait;
use image::RgbImage;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

const DEVICE_PLACEHOLDER: &str = "{device}";

#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    back_device: PathBuf,
    front_device: PathBuf,
}

impl CommandCamera {
    pub fn new(program: String, args: Vec<String>, back_device: PathBuf, front_device: PathBuf) -> Self {
        Self {
            program,
            args,
            back_device,
            front_device,
        }
    }

    pub fn device(&self, facing: Facing) -> &Path {
        match facing {
            Facing::Back => &self.back_device,
            Facing::Front => &self.front_device,
        }
    }
}

#[async_trait]
impl MediaDevices for CommandCamera {
    async fn get_user_media(&self, facing: Facing) -> Result<Vec<Box<dyn VideoTrack>>> {
        let device = self.device(facing).to_path_buf();
        let handle = File::open(&device).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => ScannerError::PermissionDenied(device.display().to_string()),
            ErrorKind::NotFound => {
                ScannerError::DeviceUnavailable(format!("{}: no such device", device.display()))
            }
            _ => ScannerError::DeviceUnavailable(format!("{}: {}", device.display(), e)),
        })?;

        debug!(device = %device.display(), "device opened");
        let args = self
            .args
            .iter()
            .map(|a| a.replace(DEVICE_PLACEHOLDER, &device.to_string_lossy()))
            .collect();

        Ok(vec![Box::new(CommandTrack {
            program: self.program.clone(),
            args,
            handle: Some(handle),
        })])
    }
}

struct CommandTrack {
    program: String,
    args: Vec<String>,
    handle: Option<File>,
}

#[async_trait]
impl VideoTrack for CommandTrack {
    fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    async fn grab_frame(&mut self) -> Result<Option<RgbImage>> {
        if self.handle.is_none() {
            return Ok(None);
        }

        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ScannerError::DeviceUnavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScannerError::DeviceUnavailable(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Ok(None);
        }

        let frame = image::load_from_memory(&output.stdout)
            .map_err(|e| ScannerError::DeviceUnavailable(format!("undecodable frame: {}", e)))?;
        Ok(Some(frame.to_rgb8()))
    }

    fn stop(&mut self) {
        self.handle = None;
    }
}
