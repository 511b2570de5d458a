use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::FrameStyle;
use super::frame::EncodedFormat;

/// The encoded strip produced by the compositor.
///
/// Handed straight to the exporter; the booth does not retain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeResult {
    pub bytes: Vec<u8>,
    pub format: EncodedFormat,
    pub width: u32,
    pub height: u32,
    pub style: FrameStyle,
    pub caption: String,
}

/// A file ready to leave the booth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub id: String,
    pub file_name: String,
    pub format: EncodedFormat,
    pub style: FrameStyle,
    pub caption: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Where an exported strip ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Handed to a share target; completion is not awaited.
    Shared { file_name: String },
    /// Written by the download target.
    Downloaded { file_name: String, path: PathBuf },
}

impl ExportOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Shared { file_name } | Self::Downloaded { file_name, .. } => file_name,
        }
    }
}

/// Metadata written alongside a downloaded strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub id: String,
    pub file_name: String,
    pub style: FrameStyle,
    pub format: EncodedFormat,
    pub caption: String,
    pub width: u32,
    pub height: u32,
    pub checksum: String,
    pub created_at: String,
}
