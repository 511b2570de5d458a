//! Discovery and loading of still images on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::LocalError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, LocalError> {
    let entries = fs::read_dir(dir).map_err(|source| LocalError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_image_file(path))
        .collect();
    images.sort();
    Ok(images)
}

/// A single image file, or every image in a directory.
pub fn resolve(path: &Path) -> Result<Vec<PathBuf>, LocalError> {
    if path.is_dir() {
        let images = list_images(path)?;
        if images.is_empty() {
            return Err(LocalError::NoImages(path.to_path_buf()));
        }
        Ok(images)
    } else if is_image_file(path) {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(LocalError::NoImages(path.to_path_buf()))
    }
}

pub fn load(path: &Path) -> Result<RgbaImage, LocalError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| LocalError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
