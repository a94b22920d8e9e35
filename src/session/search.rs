use tracing::{info, warn};

use super::{SEARCH_FAILED, Session};
use super::sink::ArchiveSink;
use crate::archive::{ArchiveService, Document};
use crate::query::SearchQuery;

impl<S: ArchiveService, K: ArchiveSink> Session<S, K> {
    /// Run a search and replace the result set with its outcome.
    ///
    /// Always leaves the store out of `Loading`. On failure the result set is
    /// empty and the returned message is also in the store's error slot.
    pub async fn search(&mut self, query: &SearchQuery) -> Result<&[Document], String> {
        let ticket = self.store.begin_search();
        info!(mode = query.mode(), "searching");

        let result = self
            .service
            .search(query)
            .await
            .map_err(|e| e.user_message(SEARCH_FAILED));

        match &result {
            Ok(docs) => info!(documents = docs.len(), "search complete"),
            Err(message) => warn!(%message, "search failed"),
        }
        self.store.complete_search(ticket, result);

        match self.store.error() {
            Some(message) => Err(message.to_string()),
            None => Ok(self.store.documents()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MockService, RecordingSink, doc};
    use super::super::Session;
    use super::super::store::{Outcome, Phase};
    use crate::archive::ArchiveError;
    use crate::query::{ProjectForm, build_project};

    fn query() -> crate::query::SearchQuery {
        build_project(&ProjectForm {
            project_ids: "P1".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn success_stores_documents() {
        let mock = MockService::with_search(Ok(vec![doc("D1"), doc("D2")]));
        let mut session = Session::new(mock, RecordingSink::default());

        let docs = session.search(&query()).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].display_title(), "Title D1");
        assert_eq!(session.store().phase(), Phase::Settled(Outcome::Success));
        let calls = session.service.search_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mode(), "project");
    }

    #[tokio::test]
    async fn empty_result_is_success() {
        let mock = MockService::with_search(Ok(vec![]));
        let mut session = Session::new(mock, RecordingSink::default());

        assert!(session.search(&query()).await.unwrap().is_empty());
        assert_eq!(session.store().phase(), Phase::Settled(Outcome::Success));
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let mock = MockService::with_search(Err(ArchiveError::Application {
            status: 400,
            message: Some("bad query".into()),
        }));
        let mut session = Session::new(mock, RecordingSink::default());

        let err = session.search(&query()).await.unwrap_err();
        assert_eq!(err, "bad query");
        assert_eq!(session.store().error(), Some("bad query"));
        assert!(session.store().documents().is_empty());
        assert_eq!(session.store().phase(), Phase::Settled(Outcome::Failure));
    }

    #[tokio::test]
    async fn missing_server_message_uses_generic_text() {
        let mock = MockService::with_search(Err(ArchiveError::Application {
            status: 502,
            message: None,
        }));
        let mut session = Session::new(mock, RecordingSink::default());

        let err = session.search(&query()).await.unwrap_err();
        assert_eq!(err, super::SEARCH_FAILED);
    }

    #[tokio::test]
    async fn new_search_drops_selection_and_results_of_failed_search() {
        let mock = MockService::with_search(Ok(vec![doc("D1"), doc("D2")]));
        mock.searches
            .borrow_mut()
            .push_back(Ok(vec![doc("D1"), doc("D3")]));
        mock.searches
            .borrow_mut()
            .push_back(Err(ArchiveError::UnexpectedResponse("garbled".into())));
        let mut session = Session::new(mock, RecordingSink::default());

        session.search(&query()).await.unwrap();
        session.toggle_all();
        assert_eq!(session.store().selection().len(), 2);

        session.search(&query()).await.unwrap();
        assert!(session.store().selection().is_empty());

        session.toggle_one("D3");
        let err = session.search(&query()).await.unwrap_err();
        assert!(err.contains("garbled"), "got: {err}");
        assert!(session.store().selection().is_empty());
        assert!(session.store().documents().is_empty());
    }
}
