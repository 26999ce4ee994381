//! The search view: one submission lifecycle with a degrade-to-demo policy.

use bizsearch_client::{SearchError, SearchService};
use bizsearch_core::{BusinessRecord, FallbackProvider};

use crate::state::ViewState;

/// An accepted submission, returned by [`SearchView::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub seq: u64,
    pub query: String,
}

/// What [`SearchView::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The service answered; `count` records are now displayed.
    Results { count: usize },
    /// The service failed; `count` fallback records are now displayed.
    Fallback { count: usize },
    /// A newer submission exists, so this outcome was discarded.
    Stale,
}

/// Holds view state and drives searches against an injected service.
///
/// Every accepted submission gets a monotonically increasing sequence number.
/// Only the outcome for the latest sequence is applied.
pub struct SearchView<S, F> {
    service: S,
    fallback: F,
    state: ViewState,
    latest_seq: u64,
}

impl<S, F> SearchView<S, F>
where
    S: SearchService,
    F: FallbackProvider,
{
    pub fn new(service: S, fallback: F) -> Self {
        Self {
            service,
            fallback,
            state: ViewState::default(),
            latest_seq: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.state.loading
    }

    /// Submits `query`, waits for the service, and applies the outcome.
    ///
    /// Returns `None` without touching state when `query` is blank.
    pub async fn submit_search(&mut self, query: &str) -> Option<Completion> {
        let submission = self.begin(query)?;
        let outcome = self.service.search(&submission.query).await;
        Some(self.complete(submission.seq, outcome))
    }

    /// First half of a submission: validates the query and enters the loading state.
    ///
    /// Returns `None` without touching state when `query` is blank.
    pub fn begin(&mut self, query: &str) -> Option<Submission> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.latest_seq += 1;
        self.state.query = trimmed.to_owned();
        self.state.loading = true;
        self.state.searched = true;
        self.state.using_fallback = false;

        tracing::debug!(seq = self.latest_seq, query = trimmed, "search submitted");

        Some(Submission {
            seq: self.latest_seq,
            query: trimmed.to_owned(),
        })
    }

    /// Second half of a submission: applies the service outcome for `seq`.
    ///
    /// Outcomes for anything but the latest submission are dropped. Failures
    /// of every kind are logged and replaced by the fallback dataset.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<Vec<BusinessRecord>, SearchError>,
    ) -> Completion {
        if seq != self.latest_seq {
            tracing::debug!(
                seq,
                latest = self.latest_seq,
                "discarding stale search outcome"
            );
            return Completion::Stale;
        }

        let completion = match outcome {
            Ok(records) => {
                let count = records.len();
                self.state.results = records;
                self.state.using_fallback = false;
                Completion::Results { count }
            }
            Err(e) => {
                tracing::warn!(
                    seq,
                    query = %self.state.query,
                    kind = e.kind(),
                    error = %e,
                    "search service unavailable, using fallback data"
                );
                self.state.results = self.fallback.records();
                self.state.using_fallback = true;
                Completion::Fallback {
                    count: self.state.results.len(),
                }
            }
        };

        self.state.loading = false;
        completion
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use bizsearch_core::{DemoDataset, NoFallback};

    use super::*;

    fn record(place_id: &str, name: &str) -> BusinessRecord {
        BusinessRecord {
            place_id: Some(place_id.to_owned()),
            name: name.to_owned(),
            address: Some("1 Front St, Toronto, ON".to_owned()),
            rating: Some(4.0),
            website: None,
            phone_number: None,
            matched_on: Some("review".to_owned()),
            matched_text: Some("Solid coffee".to_owned()),
            relevance_score: Some(80.0),
        }
    }

    enum Reply {
        Records(Vec<BusinessRecord>),
        Refused,
        Timeout,
        Malformed,
        Status(u16),
    }

    struct StubService {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        last_query: std::sync::Mutex<Option<String>>,
    }

    impl StubService {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
                last_query: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SearchService for StubService {
        async fn search(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.to_owned());
            match &self.reply {
                Reply::Records(records) => Ok(records.clone()),
                Reply::Refused => {
                    let err = reqwest::Client::new()
                        .get("http://127.0.0.1:1")
                        .send()
                        .await
                        .unwrap_err();
                    Err(SearchError::Http(err))
                }
                Reply::Timeout => Err(SearchError::Timeout { timeout_ms: 3000 }),
                Reply::Malformed => Err(SearchError::Deserialize {
                    context: "stub".to_owned(),
                    source: serde_json::from_str::<()>("{not json").unwrap_err(),
                }),
                Reply::Status(status) => Err(SearchError::UnexpectedStatus {
                    status: *status,
                    url: "http://stub/search".to_owned(),
                }),
            }
        }
    }

    fn make_view(reply: Reply) -> SearchView<StubService, DemoDataset> {
        SearchView::new(StubService::new(reply), DemoDataset)
    }

    #[tokio::test]
    async fn blank_query_is_a_no_op() {
        let mut view = make_view(Reply::Records(vec![record("a", "A")]));
        for query in ["", "   ", "\t\n"] {
            assert_eq!(view.submit_search(query).await, None);
        }
        assert_eq!(view.state(), &ViewState::default());
        assert_eq!(view.service().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_query_keeps_previous_results() {
        let mut view = make_view(Reply::Records(vec![record("a", "A"), record("b", "B")]));
        view.submit_search("coffee").await;
        let before = view.state().clone();

        assert_eq!(view.submit_search("  ").await, None);
        assert_eq!(view.state(), &before);
        assert_eq!(view.service().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_replaces_results_in_service_order() {
        let mut view = make_view(Reply::Records(vec![
            record("p1", "First"),
            record("p2", "Second"),
        ]));

        let completion = view.submit_search("coffee shop with good wifi").await;

        assert_eq!(completion, Some(Completion::Results { count: 2 }));
        let state = view.state();
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.results[0].name, "First");
        assert_eq!(state.results[1].name, "Second");
        assert!(!state.loading);
        assert!(state.searched);
        assert!(!state.using_fallback);
    }

    #[tokio::test]
    async fn query_is_trimmed_before_sending() {
        let mut view = make_view(Reply::Records(vec![]));
        view.submit_search("  pet store  ").await;
        assert_eq!(
            view.service().last_query.lock().unwrap().as_deref(),
            Some("pet store")
        );
        assert_eq!(view.state().query, "pet store");
    }

    #[tokio::test]
    async fn empty_success_is_not_fallback() {
        let mut view = make_view(Reply::Records(vec![]));
        let completion = view.submit_search("unicorn repair").await;
        assert_eq!(completion, Some(Completion::Results { count: 0 }));
        assert!(view.state().results.is_empty());
        assert!(view.state().searched);
        assert!(!view.state().using_fallback);
    }

    #[tokio::test]
    async fn every_failure_class_uses_fallback() {
        let expected = DemoDataset.records();
        for reply in [
            Reply::Refused,
            Reply::Timeout,
            Reply::Malformed,
            Reply::Status(500),
        ] {
            let mut view = make_view(reply);
            let completion = view.submit_search("coffee").await;
            assert_eq!(completion, Some(Completion::Fallback { count: 10 }));
            let state = view.state();
            assert_eq!(state.results, expected);
            assert!(state.using_fallback);
            assert!(!state.loading);
        }
    }

    #[tokio::test]
    async fn success_after_failure_clears_fallback_flag() {
        let mut view = make_view(Reply::Timeout);
        view.submit_search("coffee").await;
        assert!(view.state().using_fallback);

        let submission = view.begin("coffee again").unwrap();
        assert!(!view.state().using_fallback);
        view.complete(submission.seq, Ok(vec![record("z", "Z")]));
        assert!(!view.state().using_fallback);
        assert_eq!(view.state().results.len(), 1);
    }

    #[tokio::test]
    async fn disabled_fallback_yields_empty_results() {
        let mut view = SearchView::new(StubService::new(Reply::Timeout), NoFallback);
        let completion = view.submit_search("coffee").await;
        assert_eq!(completion, Some(Completion::Fallback { count: 0 }));
        assert!(view.state().results.is_empty());
        assert!(view.state().using_fallback);
        assert!(!view.state().loading);
    }

    #[test]
    fn begin_enters_loading_state() {
        let mut view = make_view(Reply::Records(vec![]));
        assert!(view.can_submit());
        let submission = view.begin("coffee").unwrap();
        assert_eq!(submission.seq, 1);
        assert_eq!(submission.query, "coffee");
        let state = view.state();
        assert!(state.loading);
        assert!(state.searched);
        assert!(!state.using_fallback);
        assert!(!view.can_submit());
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut view = make_view(Reply::Records(vec![]));
        let first = view.begin("first").unwrap();
        let second = view.begin("second").unwrap();
        assert!(second.seq > first.seq);

        let stale = view.complete(first.seq, Ok(vec![record("old", "Old")]));
        assert_eq!(stale, Completion::Stale);
        assert!(view.state().loading, "newer request is still in flight");
        assert!(view.state().results.is_empty());
        assert_eq!(view.state().query, "second");

        let fresh = view.complete(second.seq, Ok(vec![record("new", "New")]));
        assert_eq!(fresh, Completion::Results { count: 1 });
        assert_eq!(view.state().results[0].name, "New");
        assert!(!view.state().loading);
    }

    #[test]
    fn late_failure_does_not_overwrite_newer_results() {
        let mut view = make_view(Reply::Records(vec![]));
        let first = view.begin("first").unwrap();
        let second = view.begin("second").unwrap();

        view.complete(second.seq, Ok(vec![record("new", "New")]));
        let late = view.complete(first.seq, Err(SearchError::Timeout { timeout_ms: 3000 }));

        assert_eq!(late, Completion::Stale);
        assert!(!view.state().using_fallback);
        assert_eq!(view.state().results[0].name, "New");
        assert!(!view.state().loading);
    }

    #[test]
    fn blank_begin_does_not_advance_sequence() {
        let mut view = make_view(Reply::Records(vec![]));
        let first = view.begin("first").unwrap();
        assert!(view.begin("   ").is_none());
        assert_eq!(
            view.complete(first.seq, Ok(vec![])),
            Completion::Results { count: 0 }
        );
    }
}
