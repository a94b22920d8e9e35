use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("could not save archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Where downloaded archives end up.
///
/// `stage` acquires a temporary resource the archive is streamed into; saving
/// consumes it, and dropping it releases whatever is left. Release happens
/// exactly once.
pub trait ArchiveSink {
    type Staged: StagedArchive;

    fn stage(&self) -> Result<Self::Staged, SaveError>;
}

pub trait StagedArchive: Write {
    fn save_as(self, file_name: &str) -> Result<PathBuf, SaveError>;
}

/// Saves archives into a directory, staging through a temp file in the same directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArchiveSink for DirSink {
    type Staged = StagedFile;

    fn stage(&self) -> Result<StagedFile, SaveError> {
        std::fs::create_dir_all(&self.dir)?;
        let file = NamedTempFile::new_in(&self.dir)?;
        debug!(path = %file.path().display(), "archive staged");
        Ok(StagedFile {
            dir: self.dir.clone(),
            file: Some(file),
        })
    }
}

#[derive(Debug)]
pub struct StagedFile {
    dir: PathBuf,
    file: Option<NamedTempFile>,
}

impl StagedArchive for StagedFile {
    fn save_as(mut self, file_name: &str) -> Result<PathBuf, SaveError> {
        let dest = self.dir.join(file_name);
        if let Some(file) = self.file.take() {
            // On failure the temp file comes back inside the error and is removed with it.
            file.persist(&dest).map_err(|e| SaveError::Io(e.error))?;
        }
        Ok(dest)
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("staged archive already released")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            debug!(path = %file.path().display(), "discarding unsaved archive");
        }
    }
}
