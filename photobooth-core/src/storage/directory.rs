use std::fs;
use std::path::PathBuf;

use crate::models::composite_result::{ExportFile, ExportMetadata};
use crate::models::error::BoothError;
use crate::storage::metadata::write_metadata;
use crate::traits::export_target::DownloadTarget;

/// Download target that saves strips into a directory.
pub struct DirectoryDownload {
    directory: PathBuf,
    write_metadata: bool,
}

impl DirectoryDownload {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            write_metadata: false,
        }
    }

    /// Also write a `.metadata.json` sidecar for each file.
    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.write_metadata = enabled;
        self
    }
}

impl DownloadTarget for DirectoryDownload {
    fn save(&self, file: &ExportFile) -> Result<PathBuf, BoothError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| BoothError::ExportFailed(format!("failed to create directory: {}", e)))?;

        let path = self.directory.join(&file.file_name);
        if path.exists() {
            return Err(BoothError::ExportFailed(format!(
                "{} already exists",
                path.display()
            )));
        }
        fs::write(&path, &file.bytes)
            .map_err(|e| BoothError::ExportFailed(format!("failed to write {}: {}", path.display(), e)))?;

        if self.write_metadata {
            if let Err(e) = write_metadata(&ExportMetadata::for_file(file), &path) {
                // Leave nothing behind so a retry starts clean.
                if let Err(remove) = fs::remove_file(&path) {
                    log::warn!("failed to remove {} after sidecar error: {}", path.display(), remove);
                }
                return Err(e);
            }
        }

        log::info!("saved {} ({} bytes)", path.display(), file.bytes.len());
        Ok(path)
    }
}
