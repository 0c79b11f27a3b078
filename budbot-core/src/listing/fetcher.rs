// budbot-core/src/listing/fetcher.rs

use std::sync::Arc;
use async_trait::async_trait;

use budbot_common::traits::monitor_traits::ListingSource;
use crate::http::HttpClient;
use crate::Error;

/// Fetches the server listing from one fixed URL.
pub struct HttpListingSource {
    client: Arc<dyn HttpClient>,
    url: String,
}

impl HttpListingSource {
    pub fn new(client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self) -> Result<String, Error> {
        self.client.get(&self.url).await
    }
}
