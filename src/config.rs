use crate::analyzer::AnalysisSettings;
use crate::capture::{CommandCamera, EncodeOptions};
use crate::error::{Result, ScannerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub max_image_size: u32,
    pub jpeg_quality: u8,
    pub camera: CameraConfig,
}

/// External frame grabber used by the camera backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub program: String,
    /// `{device}` is replaced by the device node of the chosen facing
    pub args: Vec<String>,
    pub back_device: PathBuf,
    pub front_device: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".into(),
            args: [
                "-loglevel", "error", "-f", "v4l2", "-i", "{device}",
                "-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            back_device: PathBuf::from("/dev/video0"),
            front_device: PathBuf::from("/dev/video1"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default_config()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ScannerError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("food-scanner").join("config.json"))
    }

    /// Directory holding the pending capture of a failed attempt
    pub fn cache_dir() -> Result<PathBuf> {
        let base = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .ok_or_else(|| ScannerError::Config("cache directory not found".into()))?;
        Ok(base.join("food-scanner"))
    }

    fn default_config() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o".into(),
            max_tokens: 2000,
            temperature: 0.7,
            timeout_seconds: 60,
            max_image_size: 2048,
            jpeg_quality: 85,
            camera: CameraConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ScannerError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ScannerError::Config("max_tokens must be greater than 0".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(ScannerError::Config("timeout_seconds must be greater than 0".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ScannerError::Config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.max_image_size == 0 {
            return Err(ScannerError::Config("max_image_size must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn get_api_key(&self) -> Result<String> {
        // Environment wins over the stored key
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ScannerError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            max_dimension: self.max_image_size,
            jpeg_quality: self.jpeg_quality,
        }
    }

    pub fn camera(&self) -> CommandCamera {
        CommandCamera::new(
            self.camera.program.clone(),
            self.camera.args.clone(),
            self.camera.back_device.clone(),
            self.camera.front_device.clone(),
        )
    }
}
