//! HTTP client abstraction used by the listing fetcher.
//!
//! The trait lets tests swap in a canned client without touching the network.
//! The default implementation wraps reqwest and treats any non-2xx status as a
//! transport failure, so callers only ever see a body or an `Error`.

use std::time::Duration;
use async_trait::async_trait;
use reqwest;
use tracing::debug;
use crate::Error;

const USER_AGENT: &str = concat!("budbot/", env!("CARGO_PKG_VERSION"));

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: &str) -> Result<String, Error> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("GET {url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("GET {url} body could not be read: {e}")))?;
        debug!("GET {} => {} ({} bytes)", url, status, body.len());
        Ok(body)
    }
}
