use crate::archive::Document;

/// Documents marked for download, keyed by `id`.
///
/// Full records are kept so download requests carry every field the archive
/// service needs. The select-all flag is tracked, not recomputed.
#[derive(Debug, Default)]
pub struct Selection {
    docs: Vec<Document>,
    all: bool,
}

impl Selection {
    pub fn toggle_one(&mut self, doc: &Document) {
        if let Some(pos) = self.docs.iter().position(|d| d.id == doc.id) {
            self.docs.remove(pos);
        } else {
            self.docs.push(doc.clone());
        }
    }

    /// Clear when the select-all flag is set, otherwise select a copy of `documents`.
    pub fn toggle_all(&mut self, documents: &[Document]) {
        if self.all {
            self.docs.clear();
        } else {
            self.docs = documents.to_vec();
        }
        self.all = !self.all;
    }

    pub fn is_selected(&self, doc: &Document) -> bool {
        self.docs.iter().any(|d| d.id == doc.id)
    }

    pub fn reset(&mut self) {
        self.docs.clear();
        self.all = false;
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn all_selected(&self) -> bool {
        self.all
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
