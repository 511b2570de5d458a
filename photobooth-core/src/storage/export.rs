use std::sync::Arc;
use std::thread;

use uuid::Uuid;

use crate::models::composite_result::{CompositeResult, ExportFile, ExportOutcome};
use crate::models::config::FrameStyle;
use crate::models::error::BoothError;
use crate::traits::export_target::{DownloadTarget, ShareTarget};

/// Fresh collision-resistant id for an export.
pub fn new_export_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `photobooth_<id>.jpg` for plain strips, `photobooth_framed_<id>.png` for framed ones.
pub fn export_file_name(style: FrameStyle, id: &str) -> String {
    match style {
        FrameStyle::Plain => format!("photobooth_{}.jpg", id),
        FrameStyle::OverlayFramed => format!("photobooth_framed_{}.png", id),
    }
}

/// Wrap a composite result as a named file with a new id.
pub fn prepare_export(result: &CompositeResult) -> ExportFile {
    let id = new_export_id();
    ExportFile {
        file_name: export_file_name(result.style, &id),
        id,
        format: result.format,
        style: result.style,
        caption: result.caption.clone(),
        width: result.width,
        height: result.height,
        bytes: result.bytes.clone(),
    }
}

/// Sends finished strips to a share target when one can take files,
/// otherwise to the download target.
pub struct Exporter {
    share: Option<Arc<dyn ShareTarget>>,
    download: Arc<dyn DownloadTarget>,
}

impl Exporter {
    pub fn new(download: Arc<dyn DownloadTarget>) -> Self {
        Self {
            share: None,
            download,
        }
    }

    pub fn with_share(mut self, share: Arc<dyn ShareTarget>) -> Self {
        self.set_share(share);
        self
    }

    /// Attach or replace the share target, keeping the download target.
    pub fn set_share(&mut self, share: Arc<dyn ShareTarget>) {
        self.share = Some(share);
    }

    pub fn export(&self, result: &CompositeResult) -> Result<ExportOutcome, BoothError> {
        let file = prepare_export(result);

        if let Some(share) = self.share.as_ref().filter(|s| s.can_share_files()) {
            let file_name = file.file_name.clone();
            let share = Arc::clone(share);
            let pending = file.clone();
            let spawned = thread::Builder::new()
                .name("share-export".into())
                .spawn(move || {
                    if let Err(e) = share.share(&pending) {
                        log::warn!("share of {} failed: {}", pending.file_name, e);
                    }
                });

            match spawned {
                Ok(_) => {
                    log::info!("handed {} to share target", file_name);
                    return Ok(ExportOutcome::Shared { file_name });
                }
                Err(e) => log::warn!("failed to spawn share thread, downloading instead: {}", e),
            }
        }

        let path = self.download.save(&file)?;
        Ok(ExportOutcome::Downloaded {
            file_name: file.file_name,
            path,
        })
    }
}
