//! Synthetic camera for demos and tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use image::{Rgba, RgbaImage};

use photobooth_core::{BoothError, CameraConstraints, CameraDevice, FacingMode, FrameSource, VideoFrame};

pub const LEFT_COLOR: Rgba<u8> = Rgba([220, 30, 30, 255]);
pub const RIGHT_COLOR: Rgba<u8> = Rgba([30, 30, 220, 255]);

/// Camera producing a split frame: red left half, blue right half, with a
/// grey band whose brightness steps with every frame served.
pub struct TestPatternCamera {
    width: u32,
    height: u32,
    streaming: AtomicBool,
    served: AtomicU32,
}

impl TestPatternCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            streaming: AtomicBool::new(false),
            served: AtomicU32::new(0),
        }
    }

    pub fn frames_served(&self) -> u32 {
        self.served.load(Ordering::SeqCst)
    }

    /// The frame with sequence number `n`.
    pub fn pattern(width: u32, height: u32, n: u32) -> RgbaImage {
        let band_top = height / 3;
        let band_bottom = 2 * height / 3;
        let shade = ((n * 50) % 256) as u8;

        RgbaImage::from_fn(width, height, |x, y| {
            if y >= band_top && y < band_bottom {
                Rgba([shade, shade, shade, 255])
            } else if x < width / 2 {
                LEFT_COLOR
            } else {
                RIGHT_COLOR
            }
        })
    }
}

impl FrameSource for TestPatternCamera {
    fn is_available(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn start(&mut self, _constraints: &CameraConstraints) -> Result<(), BoothError> {
        if !self.is_available() {
            return Err(BoothError::CameraUnavailable(format!(
                "invalid test pattern size {}x{}",
                self.width, self.height
            )));
        }
        self.streaming.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BoothError> {
        self.streaming.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn device_info(&self) -> CameraDevice {
        CameraDevice {
            id: "test-pattern".into(),
            name: "Test Pattern".into(),
            facing: FacingMode::User,
            is_default: true,
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        if self.streaming.load(Ordering::SeqCst) {
            (self.width, self.height)
        } else {
            (0, 0)
        }
    }

    fn current_frame(&self) -> Result<VideoFrame, BoothError> {
        if !self.streaming.load(Ordering::SeqCst) {
            return Err(BoothError::FrameSourceUnavailable(
                "test pattern is not streaming".into(),
            ));
        }
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        Ok(VideoFrame::new(Self::pattern(self.width, self.height, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_halves_and_band() {
        let frame = TestPatternCamera::pattern(40, 30, 2);
        assert_eq!(*frame.get_pixel(0, 0), LEFT_COLOR);
        assert_eq!(*frame.get_pixel(39, 29), RIGHT_COLOR);
        assert_eq!(*frame.get_pixel(20, 15), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn zero_sized_pattern_is_unavailable() {
        let mut camera = TestPatternCamera::new(0, 10);
        assert!(matches!(
            camera.start(&CameraConstraints::default()),
            Err(BoothError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn serves_frames_only_while_streaming() {
        let mut camera = TestPatternCamera::new(8, 6);
        assert!(camera.current_frame().is_err());

        camera.start(&CameraConstraints::default()).unwrap();
        camera.current_frame().unwrap();
        camera.current_frame().unwrap();
        assert_eq!(camera.frames_served(), 2);

        camera.stop().unwrap();
        assert_eq!(camera.dimensions(), (0, 0));
    }
}
