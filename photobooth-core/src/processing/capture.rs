use chrono::Utc;

use super::codec;
use super::mirror::mirror_horizontal;
use crate::models::error::BoothError;
use crate::models::frame::{CapturedFrame, EncodedFormat};
use crate::traits::frame_source::FrameSource;

/// Turns the current frame of a live source into an encoded, mirrored still.
#[derive(Debug, Clone, Copy)]
pub struct FrameCapturer {
    jpeg_quality: u8,
}

impl FrameCapturer {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }

    /// Grab, mirror and JPEG-encode the frame currently on `source`.
    ///
    /// Mirroring is unconditional; the live-view toggle only affects the preview.
    pub fn capture<S: FrameSource + ?Sized>(&self, source: &S) -> Result<CapturedFrame, BoothError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(BoothError::FrameSourceUnavailable(
                "stream has not produced a frame yet".into(),
            ));
        }

        let frame = source.current_frame()?;
        let mirrored = mirror_horizontal(frame.image());
        let bytes = codec::encode_jpeg(&mirrored, self.jpeg_quality)?;

        log::debug!(
            "captured {}x{} frame ({} bytes)",
            mirrored.width(),
            mirrored.height(),
            bytes.len()
        );

        Ok(CapturedFrame {
            bytes,
            format: EncodedFormat::Jpeg,
            width: mirrored.width(),
            height: mirrored.height(),
            captured_at: Utc::now(),
        })
    }
}
