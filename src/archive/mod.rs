//! HTTP boundary to the archive service: search, archive download, catalog and health.

pub mod client;
pub mod types;

pub use client::{ArchiveClient, ArchiveError, ArchiveService};
pub use types::Document;

/// The two archive-building operations. Naming policy inside the zip is server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveVariant {
    Plain,
    Renamed,
}

impl ArchiveVariant {
    pub fn endpoint(self) -> &'static str {
        match self {
            ArchiveVariant::Plain => "/api/download",
            ArchiveVariant::Renamed => "/api/download-and-rename",
        }
    }

    /// Local file name the archive is saved under.
    pub fn file_name(self) -> &'static str {
        match self {
            ArchiveVariant::Plain => "world_bank_documents.zip",
            ArchiveVariant::Renamed => "world_bank_documents_renamed.zip",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            ArchiveVariant::Plain => "Failed to download documents",
            ArchiveVariant::Renamed => "Failed to download and rename documents",
        }
    }
}
