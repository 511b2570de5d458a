use std::path::PathBuf;

use image::RgbaImage;

use crate::models::error::BoothError;
use crate::traits::overlay_source::OverlaySource;

/// Overlay graphic read from disk at composite time.
pub struct FileOverlay {
    path: PathBuf,
}

impl FileOverlay {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OverlaySource for FileOverlay {
    fn load(&self) -> Result<RgbaImage, BoothError> {
        let image = image::open(&self.path).map_err(|e| {
            BoothError::OverlayLoadFailed(format!("failed to load {}: {}", self.path.display(), e))
        })?;
        log::debug!("loaded overlay {}", self.path.display());
        Ok(image.to_rgba8())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Overlay already held in memory, e.g. embedded with `include_bytes!`.
pub struct MemoryOverlay {
    image: RgbaImage,
}

impl MemoryOverlay {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn from_encoded(bytes: &[u8]) -> Result<Self, BoothError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| BoothError::OverlayLoadFailed(format!("failed to decode overlay: {}", e)))?;
        Ok(Self::new(image.to_rgba8()))
    }
}

impl OverlaySource for MemoryOverlay {
    fn load(&self) -> Result<RgbaImage, BoothError> {
        Ok(self.image.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory overlay {}x{}", self.image.width(), self.image.height())
    }
}
