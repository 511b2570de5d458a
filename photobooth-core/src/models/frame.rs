use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::error::BoothError;

/// Which way the requested camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    Environment,
}

/// Constraints passed to a frame source when it is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Photobooth streams never carry audio; kept so backends can assert it.
    pub audio: bool,
    pub facing: FacingMode,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            audio: false,
            facing: FacingMode::User,
        }
    }
}

/// A camera device available to the booth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub facing: FacingMode,
    pub is_default: bool,
}

/// Compressed raster formats produced by the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodedFormat {
    Jpeg,
    Png,
}

impl EncodedFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// One decoded frame read from a live source.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    image: RgbaImage,
}

impl VideoFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Build a frame from tightly packed RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BoothError> {
        RgbaImage::from_raw(width, height, pixels)
            .map(Self::new)
            .ok_or_else(|| {
                BoothError::FrameSourceUnavailable(format!(
                    "pixel buffer does not match {}x{} RGBA frame",
                    width, height
                ))
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// An encoded still produced by the frame capturer.
///
/// Its position within the session is implicit in the session ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub format: EncodedFormat,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}
