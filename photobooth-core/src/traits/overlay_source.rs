use image::RgbaImage;

use crate::models::error::BoothError;

/// Supplies the decorative graphic drawn over overlay-framed strips.
///
/// Loading may block; the compositor runs it on its own thread and gives up
/// after the configured timeout.
pub trait OverlaySource: Send + Sync {
    fn load(&self) -> Result<RgbaImage, BoothError>;

    /// Human readable origin, used in log lines and errors.
    fn describe(&self) -> String;
}
