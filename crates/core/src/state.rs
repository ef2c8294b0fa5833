use crate::{SearchResult, SubmitPolicy};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Lifecycle stage of the current search attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// No search attempted yet.
    Idle,
    Loading { request: u64 },
    Success(Vec<SearchResult>),
    Error(String),
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Proof that a request was started. Only [`QueryStore::begin_search`] mints
/// these, and a ticket is only honoured by the store that minted it, so a
/// completion can never be applied to a state that was not loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    store: u64,
    sequence: u64,
}

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    store: u64,
    query_text: String,
    status: SearchStatus,
    last_issued: u64,
}

impl QueryState {
    fn new(store: u64) -> Self {
        Self {
            store,
            query_text: String::new(),
            status: SearchStatus::Idle,
            last_issued: 0,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Loading { .. })
    }

    /// Empty unless the last search succeeded.
    pub fn results(&self) -> &[SearchResult] {
        match &self.status {
            SearchStatus::Success(results) => results,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SearchStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    fn set_query_text(&mut self, text: String) -> bool {
        if self.query_text == text {
            return false;
        }
        self.query_text = text;
        true
    }

    fn begin(&mut self, policy: SubmitPolicy) -> Option<RequestTicket> {
        if self.query_text.trim().is_empty() {
            return None;
        }
        if self.is_loading() && policy == SubmitPolicy::RejectWhileLoading {
            return None;
        }

        self.last_issued += 1;
        self.status = SearchStatus::Loading {
            request: self.last_issued,
        };
        Some(RequestTicket {
            store: self.store,
            sequence: self.last_issued,
        })
    }

    fn is_pending(&self, ticket: RequestTicket) -> bool {
        match self.status {
            SearchStatus::Loading { request } => {
                ticket.store == self.store && request == ticket.sequence
            }
            _ => false,
        }
    }

    fn complete(&mut self, ticket: RequestTicket, results: Vec<SearchResult>) -> bool {
        if !self.is_pending(ticket) {
            return false;
        }
        self.status = SearchStatus::Success(results);
        true
    }

    fn fail(&mut self, ticket: RequestTicket, message: String) -> bool {
        if !self.is_pending(ticket) {
            return false;
        }
        self.status = SearchStatus::Error(message);
        true
    }
}

/// Owns the [`QueryState`] and publishes every effective change to
/// subscribers. Mutations that do not change anything publish nothing.
pub struct QueryStore {
    sender: watch::Sender<QueryState>,
    policy: SubmitPolicy,
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new(SubmitPolicy::default())
    }
}

impl QueryStore {
    pub fn new(policy: SubmitPolicy) -> Self {
        let store = NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed);
        let (sender, _) = watch::channel(QueryState::new(store));
        Self { sender, policy }
    }

    pub fn snapshot(&self) -> QueryState {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.sender.subscribe()
    }

    pub fn set_query_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.sender.send_if_modified(move |state| state.set_query_text(text));
    }

    /// Moves to loading and returns the ticket for the new request, or
    /// `None` when the query is blank or a request is already in flight
    /// under [`SubmitPolicy::RejectWhileLoading`].
    pub fn begin_search(&self) -> Option<RequestTicket> {
        let policy = self.policy;
        let mut ticket = None;
        self.sender.send_if_modified(|state| {
            ticket = state.begin(policy);
            ticket.is_some()
        });

        if let Some(ticket) = ticket {
            debug!(request = ticket.sequence(), "search started");
        }
        ticket
    }

    /// Returns `false` when the ticket is no longer the pending request.
    pub fn complete_search(&self, ticket: RequestTicket, results: Vec<SearchResult>) -> bool {
        self.sender.send_if_modified(move |state| state.complete(ticket, results))
    }

    pub fn fail_search(&self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        let message = message.into();
        self.sender.send_if_modified(move |state| state.fail(ticket, message))
    }
}
