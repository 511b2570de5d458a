use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::frame::CameraConstraints;

/// Number of frames in a complete session.
pub const SESSION_FRAMES: usize = 3;

/// Seconds counted down before a manual single shot.
pub const SINGLE_SHOT_COUNTDOWN_SECS: u32 = 3;

/// Seconds between shots of an automatic burst.
pub const BURST_INTERVAL_SECS: u32 = 3;

/// Browser default JPEG quality (0.92) on the 1..=100 scale.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Label printed on the first footer line of every strip.
pub const DEFAULT_FOOTER_LABEL: &str = "PhotoBooth";

/// Visual treatment applied when compositing a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    /// Pink background, encoded as JPEG.
    #[default]
    Plain,
    /// White background with a decorative overlay above the photos, encoded as PNG.
    OverlayFramed,
}

/// Per-strip options chosen at compositing time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositeConfig {
    /// Caption text; may be empty.
    pub caption: String,
    pub style: FrameStyle,
}

impl CompositeConfig {
    pub fn new(caption: impl Into<String>, style: FrameStyle) -> Self {
        Self {
            caption: caption.into(),
            style,
        }
    }
}

/// Shape of a countdown sequence.
///
/// `single()` is the manual one-shot countdown the user repeats;
/// `burst()` captures a full session unattended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownPlan {
    pub total_shots: u32,
    pub interval_secs: u32,
    /// Start from an empty session.
    pub clear_session: bool,
}

impl CountdownPlan {
    pub fn single() -> Self {
        Self {
            total_shots: 1,
            interval_secs: SINGLE_SHOT_COUNTDOWN_SECS,
            clear_session: false,
        }
    }

    pub fn burst() -> Self {
        Self::burst_with_interval(BURST_INTERVAL_SECS)
    }

    pub fn burst_with_interval(interval_secs: u32) -> Self {
        Self {
            total_shots: SESSION_FRAMES as u32,
            interval_secs,
            clear_session: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.total_shots == 0 {
            return Err("countdown needs at least one shot".into());
        }
        if self.interval_secs == 0 {
            return Err("countdown interval must be positive".into());
        }
        Ok(())
    }
}

impl Default for CountdownPlan {
    fn default() -> Self {
        Self::burst()
    }
}

/// How countdown ticks are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// A background thread calls `tick` once per period.
    Thread(Duration),
    /// The host calls `tick` from its own event loop once per second.
    Manual,
}

/// Configuration for a photobooth.
#[derive(Debug, Clone)]
pub struct BoothConfiguration {
    pub camera: CameraConstraints,

    /// Plan used by `start_default_countdown`.
    pub countdown: CountdownPlan,

    pub tick_mode: TickMode,

    /// JPEG quality for captures and plain strips, 1..=100 (default: 92).
    pub jpeg_quality: u8,

    /// Transparent decorative graphic for the overlay-framed style.
    pub overlay_path: Option<PathBuf>,

    /// How long compositing waits for the overlay before failing.
    pub overlay_timeout: Duration,

    /// Bold TTF/OTF for caption and footer text, replacing the bundled font.
    pub font_path: Option<PathBuf>,

    pub footer_label: String,

    /// Directory that receives downloaded strips.
    pub output_directory: PathBuf,

    /// Write a `.metadata.json` sidecar next to each download.
    pub write_metadata: bool,
}

impl BoothConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        self.countdown.validate()?;
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!("unsupported jpeg quality: {}", self.jpeg_quality));
        }
        if let TickMode::Thread(period) = self.tick_mode {
            if period.is_zero() {
                return Err("tick period must be positive".into());
            }
        }
        if self.overlay_timeout.is_zero() {
            return Err("overlay timeout must be positive".into());
        }
        if self.camera.audio {
            return Err("photobooth streams do not carry audio".into());
        }
        Ok(())
    }
}

impl Default for BoothConfiguration {
    fn default() -> Self {
        Self {
            camera: CameraConstraints::default(),
            countdown: CountdownPlan::default(),
            tick_mode: TickMode::Thread(Duration::from_secs(1)),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            overlay_path: None,
            overlay_timeout: Duration::from_secs(5),
            font_path: None,
            footer_label: DEFAULT_FOOTER_LABEL.to_string(),
            output_directory: PathBuf::from("."),
            write_metadata: true,
        }
    }
}
