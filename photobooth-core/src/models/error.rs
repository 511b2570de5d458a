use thiserror::Error;

/// Errors surfaced by photobooth operations.
///
/// Every variant is recoverable: the caller reports it and the user can
/// retry the action that triggered it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoothError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("frame source unavailable: {0}")]
    FrameSourceUnavailable(String),

    #[error("incomplete session: {captured} of {required} frames captured")]
    IncompleteSession { captured: usize, required: usize },

    #[error("overlay load failed: {0}")]
    OverlayLoadFailed(String),

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}

impl BoothError {
    /// Short stable identifier, suitable for UI lookup tables.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CameraUnavailable(_) => "camera_unavailable",
            Self::FrameSourceUnavailable(_) => "frame_source_unavailable",
            Self::IncompleteSession { .. } => "incomplete_session",
            Self::OverlayLoadFailed(_) => "overlay_load_failed",
            Self::ExportFailed(_) => "export_failed",
            Self::EncodingFailed(_) => "encoding_failed",
            Self::ConfigurationFailed(_) => "configuration_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_session_message_names_counts() {
        let err = BoothError::IncompleteSession {
            captured: 2,
            required: 3,
        };
        assert_eq!(err.to_string(), "incomplete session: 2 of 3 frames captured");
        assert_eq!(err.kind(), "incomplete_session");
    }
}
