use tracing::debug;

use super::selection::Selection;
use crate::archive::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Settled(Outcome),
}

/// Handle for one in-flight search. Only the newest ticket may settle the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single owner of result set, selection, loading phase and the visible error.
#[derive(Debug)]
pub struct Store {
    documents: Vec<Document>,
    selection: Selection,
    phase: Phase,
    error: Option<String>,
    generation: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            selection: Selection::default(),
            phase: Phase::Idle,
            error: None,
            generation: 0,
        }
    }
}

impl Store {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enter `Loading`, clear the error, and issue a ticket newer than any before it.
    pub fn begin_search(&mut self) -> Ticket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.error = None;
        Ticket(self.generation)
    }

    /// Apply a search result. Returns `false` (and changes nothing) for a stale ticket.
    ///
    /// When applied, the result set is replaced wholesale and the selection reset.
    pub fn complete_search(&mut self, ticket: Ticket, result: Result<Vec<Document>, String>) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                latest = self.generation,
                "discarding stale search response"
            );
            return false;
        }

        self.selection.reset();
        match result {
            Ok(documents) => {
                self.documents = documents;
                self.phase = Phase::Settled(Outcome::Success);
            }
            Err(message) => {
                self.documents.clear();
                self.error = Some(message);
                self.phase = Phase::Settled(Outcome::Failure);
            }
        }
        true
    }

    /// Overwrite the visible error slot.
    pub fn report_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Toggle the current-result document with this `id`. `None` if there is no such document.
    pub fn toggle_one(&mut self, id: &str) -> Option<bool> {
        let doc = self.documents.iter().find(|d| d.id == id)?;
        self.selection.toggle_one(doc);
        Some(self.selection.is_selected(doc))
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.documents);
    }
}
