use crate::state::{QueryStore, RequestTicket};
use crate::traits::SearchBackend;
use crate::SubmitPolicy;
use tracing::{debug, info, warn};

/// What a single call to [`SearchController::submit`] ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank query; nothing happened.
    Skipped,
    /// A request was already in flight; nothing was sent.
    Rejected,
    Completed { results: usize },
    Failed { message: String },
    /// A newer submission took over before this one came back; its outcome
    /// was dropped.
    Superseded,
}

/// A submission that has moved the store to loading but whose request has
/// not been sent yet.
#[derive(Debug)]
pub struct PendingSearch {
    ticket: RequestTicket,
    query: String,
}

impl PendingSearch {
    pub fn sequence(&self) -> u64 {
        self.ticket.sequence()
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Drives one backend request per submission and folds the outcome back
/// into the [`QueryStore`]. Failures never escape: they end up as the
/// store's error message.
pub struct SearchController<B> {
    backend: B,
    store: QueryStore,
}

impl<B> SearchController<B>
where
    B: SearchBackend + Send + Sync,
{
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, SubmitPolicy::default())
    }

    pub fn with_policy(backend: B, policy: SubmitPolicy) -> Self {
        Self {
            backend,
            store: QueryStore::new(policy),
        }
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn submit_current(&self) -> SubmitOutcome {
        let text = self.store.snapshot().query_text().to_string();
        self.submit(&text).await
    }

    pub async fn submit(&self, query_text: &str) -> SubmitOutcome {
        match self.begin(query_text) {
            Ok(pending) => self.finish(pending).await,
            Err(outcome) => outcome,
        }
    }

    /// The synchronous half of [`SearchController::submit`]: validates the
    /// text and moves the store to loading. `Err` carries the outcome of a
    /// submission that never reached the network.
    pub fn begin(&self, query_text: &str) -> Result<PendingSearch, SubmitOutcome> {
        let query = query_text.trim();
        if query.is_empty() {
            return Err(SubmitOutcome::Skipped);
        }

        self.store.set_query_text(query_text);
        let Some(ticket) = self.store.begin_search() else {
            debug!(query, "search already in flight, submission ignored");
            return Err(SubmitOutcome::Rejected);
        };

        Ok(PendingSearch {
            ticket,
            query: query.to_string(),
        })
    }

    /// Sends the request for `pending` and folds its outcome into the store.
    pub async fn finish(&self, pending: PendingSearch) -> SubmitOutcome {
        let PendingSearch { ticket, query } = pending;

        let (applied, outcome) = match self.backend.search(&query).await {
            Ok(results) => {
                let count = results.len();
                let applied = self.store.complete_search(ticket, results);
                (applied, SubmitOutcome::Completed { results: count })
            }
            Err(error) => {
                let message = error.user_message();
                warn!(request = ticket.sequence(), %error, "search failed");
                let applied = self.store.fail_search(ticket, message.clone());
                (applied, SubmitOutcome::Failed { message })
            }
        };

        if !applied {
            debug!(request = ticket.sequence(), "stale completion discarded");
            return SubmitOutcome::Superseded;
        }

        if let SubmitOutcome::Completed { results } = outcome {
            info!(request = ticket.sequence(), %query, results, "search completed");
        }
        outcome
    }
}
