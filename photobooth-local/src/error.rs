use std::path::PathBuf;

use thiserror::Error;

use photobooth_core::BoothError;

/// Failures specific to the local backends.
#[derive(Debug, Error)]
pub enum LocalError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("no images found in {0}")]
    NoImages(PathBuf),
}

impl From<LocalError> for BoothError {
    fn from(err: LocalError) -> Self {
        BoothError::CameraUnavailable(err.to_string())
    }
}
