use std::path::PathBuf;

use crate::models::composite_result::ExportFile;
use crate::models::error::BoothError;

/// A native share mechanism.
pub trait ShareTarget: Send + Sync {
    /// Whether the target can take file payloads at all.
    fn can_share_files(&self) -> bool;

    /// Hand the file over. Runs on a detached thread; errors are only logged.
    fn share(&self, file: &ExportFile) -> Result<(), BoothError>;
}

/// Fallback that saves the file locally.
pub trait DownloadTarget: Send + Sync {
    /// Save the file and return where it was written.
    fn save(&self, file: &ExportFile) -> Result<PathBuf, BoothError>;
}
