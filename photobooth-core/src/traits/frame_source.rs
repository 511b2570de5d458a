use crate::models::error::BoothError;
use crate::models::frame::{CameraConstraints, CameraDevice, VideoFrame};

/// Interface for live camera feeds.
///
/// Implemented by:
/// - `StillImageCamera` (photobooth-local)
/// - `TestPatternCamera` (photobooth-local)
pub trait FrameSource: Send + Sync {
    /// Whether a device backing this source exists right now.
    fn is_available(&self) -> bool;

    /// Attach the stream. Fails with `CameraUnavailable` when the device is
    /// missing or access is refused.
    fn start(&mut self, constraints: &CameraConstraints) -> Result<(), BoothError>;

    /// Detach the stream and release the device.
    fn stop(&mut self) -> Result<(), BoothError>;

    /// Information about the device backing this source.
    fn device_info(&self) -> CameraDevice;

    /// Current frame size, `(0, 0)` until the stream has produced a frame.
    fn dimensions(&self) -> (u32, u32);

    /// The frame currently on the stream.
    ///
    /// Fails with `FrameSourceUnavailable` when no stream is attached or it
    /// has not produced a frame yet.
    fn current_frame(&self) -> Result<VideoFrame, BoothError>;
}
