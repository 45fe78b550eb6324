//! Terminal file picker
//!
//! Lists the images directly inside a folder and lets the user choose one.

use crate::error::{Result, ScannerError};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(ScannerError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| ImageInfo {
            file_name: e.file_name().to_string_lossy().to_string(),
            path: e.into_path(),
        })
        .collect();

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}

/// Ask the user to choose one image; `None` if they cancel
pub fn pick_interactive(images: &[ImageInfo]) -> Result<Option<PathBuf>> {
    if images.is_empty() {
        return Ok(None);
    }

    let names: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Escolha a foto da refeição")
        .items(&names)
        .default(0)
        .interact_opt()
        .map_err(|e| ScannerError::Io(std::io::Error::other(e.to_string())))?;

    Ok(selection.map(|i| images[i].path.clone()))
}
