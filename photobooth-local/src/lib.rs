//! # photobooth-local
//!
//! Local backends for photobooth-core.
//!
//! Provides:
//! - `StillImageCamera`: plays an image file or directory of images as a live feed
//! - `TestPatternCamera`: deterministic synthetic feed
//! - `CameraEnumerator`: lists image directories as camera devices
//! - `CommandShare`: hands exported strips to an external program
//!
//! ## Usage
//! ```ignore
//! use photobooth_core::{BoothConfiguration, CompositeConfig, CountdownPlan, FrameStyle, Photobooth};
//! use photobooth_local::StillImageCamera;
//!
//! let camera = StillImageCamera::new("shots/".into());
//! let mut booth = Photobooth::new(camera, BoothConfiguration::default())?;
//! booth.open_camera()?;
//! booth.start_countdown(CountdownPlan::burst())?;
//! booth.wait_until_idle(std::time::Duration::from_secs(15));
//! let strip = booth.composite(&CompositeConfig::new("Party!", FrameStyle::Plain))?;
//! booth.export(&strip)?;
//! ```

pub mod command_share;
pub mod device_enumerator;
pub mod error;
mod images;
pub mod still_camera;
pub mod test_pattern;

pub use command_share::CommandShare;
pub use device_enumerator::CameraEnumerator;
pub use error::LocalError;
pub use still_camera::StillImageCamera;
pub use test_pattern::TestPatternCamera;
