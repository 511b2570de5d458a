//! Lists local still-image cameras.
//!
//! A camera root holds images directly (the default device) and/or
//! subdirectories of images, each of which is a further device.

use std::fs;
use std::path::PathBuf;

use photobooth_core::{BoothError, CameraDevice, FacingMode};

use crate::error::LocalError;
use crate::images;

pub struct CameraEnumerator {
    root: PathBuf,
}

impl CameraEnumerator {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Every device under the root, the default first.
    pub fn list_devices(&self) -> Result<Vec<CameraDevice>, BoothError> {
        let mut devices = Vec::new();

        if !images::list_images(&self.root)?.is_empty() {
            devices.push(self.device(self.root.clone(), true));
        }

        let entries = fs::read_dir(&self.root).map_err(|source| LocalError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        subdirs.sort();

        for dir in subdirs {
            match images::list_images(&dir) {
                Ok(found) if !found.is_empty() => {
                    let is_default = devices.is_empty();
                    devices.push(self.device(dir, is_default));
                }
                Ok(_) => {}
                Err(e) => log::warn!("skipping camera directory: {}", e),
            }
        }

        Ok(devices)
    }

    /// The default device, if any exists.
    pub fn default_device(&self) -> Result<CameraDevice, BoothError> {
        self.list_devices()?
            .into_iter()
            .find(|d| d.is_default)
            .ok_or_else(|| LocalError::NoImages(self.root.clone()).into())
    }

    fn device(&self, path: PathBuf, is_default: bool) -> CameraDevice {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Camera".into());
        CameraDevice {
            id: path.display().to_string(),
            name,
            facing: FacingMode::User,
            is_default,
        }
    }
}
