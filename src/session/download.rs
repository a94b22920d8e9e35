use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::Session;
use super::sink::{ArchiveSink, StagedArchive};
use crate::archive::{ArchiveService, ArchiveVariant};

impl<S: ArchiveService, K: ArchiveSink> Session<S, K> {
    pub async fn download_plain(&mut self) -> Result<Option<PathBuf>, String> {
        self.download(ArchiveVariant::Plain).await
    }

    pub async fn download_renamed(&mut self) -> Result<Option<PathBuf>, String> {
        self.download(ArchiveVariant::Renamed).await
    }

    /// Request an archive of the current selection and save it under the variant's name.
    ///
    /// The archive streams into a staged file that is saved only once the
    /// transfer completes; a failed transfer releases it unsaved. `Ok(None)`
    /// without any request when nothing is selected. Failures go to the store's
    /// error slot, replacing whatever was there.
    pub async fn download(&mut self, variant: ArchiveVariant) -> Result<Option<PathBuf>, String> {
        let selected = self.store.selection().documents();
        if selected.is_empty() {
            return Ok(None);
        }
        info!(documents = selected.len(), ?variant, "downloading archive");

        let result = match self.sink.stage() {
            Ok(mut staged) => match self.service.download(selected, variant, &mut staged).await {
                Ok(bytes) => {
                    debug!(bytes, "archive transferred");
                    staged
                        .save_as(variant.file_name())
                        .map_err(|e| e.to_string())
                }
                Err(e) => Err(e.user_message(variant.failure_message())),
            },
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(path) => {
                info!(path = %path.display(), "archive saved");
                Ok(Some(path))
            }
            Err(message) => {
                warn!(%message, "download failed");
                self.store.report_error(message.clone());
                Err(message)
            }
        }
    }
}
