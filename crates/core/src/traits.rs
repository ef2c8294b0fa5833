use crate::{ClientError, SearchResult};
use async_trait::async_trait;

/// The remote side of a search: one query in, one ranked list or one
/// error out.
#[async_trait]
pub trait SearchBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError>;
}
