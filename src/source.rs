use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::models::{Page, RawPage};

/// Supplier of one feed page per call. The production implementation talks
/// HTTP; tests substitute mocks behind this seam.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, page_index: u32) -> Result<Page, FetchError>;
}

/// `FeedSource` over the JSON section endpoint:
/// `GET <feed-url>&pageIndex=<n>`. Request timeouts live on the client, not
/// in the engine.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    feed_url: String,
}

impl HttpFeedSource {
    pub fn new(client: Client, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
        }
    }

    /// Builds a source from config with a timeout-carrying client.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::new(client, config.feed_url.clone()))
    }

    fn page_url(&self, page_index: u32) -> String {
        format!("{}&pageIndex={}", self.feed_url, page_index)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_page(&self, page_index: u32) -> Result<Page, FetchError> {
        let url = self.page_url(page_index);
        debug!(%url, "fetching feed page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await?;
        let raw: RawPage = serde_json::from_slice(&bytes)?;
        let page = Page::from_raw(raw);
        debug!(page_index, items = page.articles.len(), "feed page fetched");
        Ok(page)
    }
}
