//! # photobooth-core
//!
//! Platform-agnostic photobooth core library.
//!
//! Provides the countdown scheduler, mirrored frame capture, three-photo
//! strip compositing and export. Camera backends implement the
//! `FrameSource` trait and plug into the generic `Photobooth`.
//!
//! ## Architecture
//!
//! ```text
//! photobooth-core (this crate)
//! ├── traits/       ← FrameSource, BoothDelegate, OverlaySource, ShareTarget, DownloadTarget
//! ├── models/       ← BoothError, CountdownState, BoothConfiguration, CapturedFrame, etc.
//! ├── processing/   ← mirror, codec, strip layout, text, FrameCapturer, StripCompositor
//! ├── session/      ← FrameSession, Countdown, Photobooth (generic orchestrator)
//! └── storage/      ← Exporter, DirectoryDownload, overlays, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::composite_result::{CompositeResult, ExportFile, ExportMetadata, ExportOutcome};
pub use models::config::{
    BoothConfiguration, CompositeConfig, CountdownPlan, FrameStyle, TickMode, SESSION_FRAMES,
};
pub use models::error::BoothError;
pub use models::frame::{
    CameraConstraints, CameraDevice, CapturedFrame, EncodedFormat, FacingMode, VideoFrame,
};
pub use models::state::{BoothSnapshot, CountdownState};
pub use processing::capture::FrameCapturer;
pub use processing::compositor::StripCompositor;
pub use processing::layout::StripLayout;
pub use processing::text::TextRenderer;
pub use session::booth::{Photobooth, StartOutcome};
pub use session::countdown::{Countdown, ShotOutcome, Tick};
pub use session::frames::FrameSession;
pub use storage::directory::DirectoryDownload;
pub use storage::export::Exporter;
pub use storage::overlay::{FileOverlay, MemoryOverlay};
pub use traits::booth_delegate::BoothDelegate;
pub use traits::export_target::{DownloadTarget, ShareTarget};
pub use traits::frame_source::FrameSource;
pub use traits::overlay_source::OverlaySource;
