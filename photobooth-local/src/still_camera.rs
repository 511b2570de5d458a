//! Still-image camera.
//!
//! Plays a single image file, or a directory of images in name order, as a
//! live feed. Each `current_frame` call advances to the next image and wraps
//! around at the end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;
use parking_lot::RwLock;

use photobooth_core::{BoothError, CameraConstraints, CameraDevice, FacingMode, FrameSource, VideoFrame};

use crate::images;

pub struct StillImageCamera {
    path: PathBuf,
    name: String,
    is_default: bool,
    frames: RwLock<Vec<RgbaImage>>,
    cursor: AtomicUsize,
}

impl StillImageCamera {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Still Camera".into());
        Self {
            path,
            name,
            is_default: false,
            frames: RwLock::new(Vec::new()),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create a camera for a device returned by `CameraEnumerator`.
    pub fn for_device(device: &CameraDevice) -> Self {
        Self {
            name: device.name.clone(),
            is_default: device.is_default,
            ..Self::new(PathBuf::from(&device.id))
        }
    }

    /// Number of images loaded into the feed.
    pub fn frame_count(&self) -> usize {
        self.frames.read().len()
    }
}

impl FrameSource for StillImageCamera {
    fn is_available(&self) -> bool {
        images::resolve(&self.path).is_ok()
    }

    fn start(&mut self, constraints: &CameraConstraints) -> Result<(), BoothError> {
        if constraints.facing != FacingMode::User {
            log::debug!("still camera ignores facing mode {:?}", constraints.facing);
        }

        let mut frames = Vec::new();
        for path in images::resolve(&self.path)? {
            frames.push(images::load(&path)?);
        }
        log::info!("still camera {} loaded {} frame(s)", self.path.display(), frames.len());

        *self.frames.write() = frames;
        self.cursor.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BoothError> {
        self.frames.write().clear();
        Ok(())
    }

    fn device_info(&self) -> CameraDevice {
        CameraDevice {
            id: self.path.display().to_string(),
            name: self.name.clone(),
            facing: FacingMode::User,
            is_default: self.is_default,
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        let frames = self.frames.read();
        if frames.is_empty() {
            return (0, 0);
        }
        let index = self.cursor.load(Ordering::SeqCst) % frames.len();
        frames[index].dimensions()
    }

    fn current_frame(&self) -> Result<VideoFrame, BoothError> {
        let frames = self.frames.read();
        if frames.is_empty() {
            return Err(BoothError::FrameSourceUnavailable(
                "still camera is not streaming".into(),
            ));
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % frames.len();
        Ok(VideoFrame::new(frames[index].clone()))
    }
}
