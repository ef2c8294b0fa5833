pub mod backends;
pub mod controller;
pub mod error;
pub mod models;
pub mod state;
pub mod traits;
pub mod view;

pub use backends::HttpSearchClient;
pub use controller::{PendingSearch, SearchController, SubmitOutcome};
pub use error::{resolve_error_message, ClientError, DEFAULT_ERROR_MESSAGE};
pub use models::{ErrorPayload, ResultMetadata, SearchResponse, SearchResult, SubmitPolicy};
pub use state::{QueryState, QueryStore, RequestTicket, SearchStatus};
pub use traits::SearchBackend;
pub use view::{project, submit_enabled, RenderBranch, ResultCard, NO_RESULTS_MESSAGE};
