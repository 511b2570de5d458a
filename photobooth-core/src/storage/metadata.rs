use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::composite_result::{ExportFile, ExportMetadata};
use crate::models::error::BoothError;

impl ExportMetadata {
    /// Describe an export, checksumming its bytes.
    pub fn for_file(file: &ExportFile) -> Self {
        Self {
            id: file.id.clone(),
            file_name: file.file_name.clone(),
            style: file.style,
            format: file.format,
            caption: file.caption.clone(),
            width: file.width,
            height: file.height,
            checksum: sha256_hex(&file.bytes),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// `photobooth_<id>.jpg` keeps its sidecar at `photobooth_<id>.metadata.json`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("metadata.json")
}

/// Pretty-printed JSON next to the image. Returns where it landed.
pub fn write_metadata(metadata: &ExportMetadata, image_path: &Path) -> Result<PathBuf, BoothError> {
    let sidecar = sidecar_path(image_path);
    let json = serde_json::to_vec_pretty(metadata).map_err(|e| {
        BoothError::ExportFailed(format!("cannot encode sidecar for {}: {}", metadata.file_name, e))
    })?;
    fs::write(&sidecar, json)
        .map_err(|e| BoothError::ExportFailed(format!("cannot write {}: {}", sidecar.display(), e)))?;
    Ok(sidecar)
}

pub fn read_metadata(image_path: &Path) -> Result<ExportMetadata, BoothError> {
    let sidecar = sidecar_path(image_path);
    let bytes = fs::read(&sidecar)
        .map_err(|e| BoothError::ExportFailed(format!("cannot read {}: {}", sidecar.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| BoothError::ExportFailed(format!("malformed sidecar {}: {}", sidecar.display(), e)))
}

/// SHA-256 digest as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data).iter().map(|b| format!("{:02x}", b)).collect()
}
