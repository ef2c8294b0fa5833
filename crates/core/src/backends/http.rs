use crate::traits::SearchBackend;
use crate::{ClientError, ErrorPayload, SearchResponse, SearchResult};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const SEARCH_PATH: &str = "api/search";

/// Talks to `GET {endpoint}/api/search?q=...`.
pub struct HttpSearchClient {
    client: Client,
    search_url: Url,
}

impl HttpSearchClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Self::build(endpoint, Client::builder())
    }

    /// Same as [`HttpSearchClient::new`] but gives up on requests that take
    /// longer than `timeout`. A timeout surfaces as [`ClientError::Http`].
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        Self::build(endpoint, Client::builder().timeout(timeout))
    }

    fn build(endpoint: &str, builder: ClientBuilder) -> Result<Self, ClientError> {
        Ok(Self {
            client: builder.build()?,
            search_url: search_url(endpoint)?,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

fn search_url(endpoint: &str) -> Result<Url, ClientError> {
    let mut base = Url::parse(endpoint.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(SEARCH_PATH)?)
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        let url = self.request_url(query.trim());
        debug!(%url, "querying search endpoint");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .ok()
                .and_then(|payload| payload.error);
            warn!(
                status = status.as_u16(),
                has_message = message.is_some(),
                "search endpoint returned an error"
            );
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|error| ClientError::MalformedPayload(error.to_string()))?;
        debug!(count = parsed.results.len(), "search endpoint answered");
        Ok(parsed.results)
    }
}
