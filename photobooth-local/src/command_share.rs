//! Share target that hands exported strips to an external program,
//! e.g. `xdg-open`, `open` or a messaging CLI.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use photobooth_core::{BoothError, ExportFile, ShareTarget};

pub struct CommandShare {
    program: String,
    args: Vec<String>,
    staging_dir: PathBuf,
}

impl CommandShare {
    /// The file path is appended after `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>, staging_dir: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            staging_dir,
        }
    }
}

impl ShareTarget for CommandShare {
    fn can_share_files(&self) -> bool {
        !self.program.trim().is_empty()
    }

    fn share(&self, file: &ExportFile) -> Result<(), BoothError> {
        fs::create_dir_all(&self.staging_dir)
            .map_err(|e| BoothError::ExportFailed(format!("failed to create staging dir: {}", e)))?;
        let path = self.staging_dir.join(&file.file_name);
        fs::write(&path, &file.bytes)
            .map_err(|e| BoothError::ExportFailed(format!("failed to stage {}: {}", path.display(), e)))?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .status()
            .map_err(|e| BoothError::ExportFailed(format!("failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(BoothError::ExportFailed(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        log::info!("shared {} via {}", file.file_name, self.program);
        Ok(())
    }
}
