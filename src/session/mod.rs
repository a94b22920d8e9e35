//! Search-select-download orchestration over a single owned [`Store`].

mod download;
mod search;
pub mod selection;
pub mod sink;
pub mod store;

pub use sink::{ArchiveSink, DirSink};
pub use store::Store;

use crate::archive::ArchiveService;

pub const SEARCH_FAILED: &str = "Failed to search for documents";

/// Drives the archive service on behalf of one user and records the results in its store.
pub struct Session<S, K> {
    service: S,
    sink: K,
    store: Store,
}

impl<S: ArchiveService, K: ArchiveSink> Session<S, K> {
    pub fn new(service: S, sink: K) -> Self {
        Self {
            service,
            sink,
            store: Store::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// See [`Store::toggle_one`].
    pub fn toggle_one(&mut self, id: &str) -> Option<bool> {
        self.store.toggle_one(id)
    }

    pub fn toggle_all(&mut self) {
        self.store.toggle_all();
    }
}
