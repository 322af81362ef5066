//! HTTP transport used by the Horizon client.
//!
//! The client only needs "GET this URL and give me the body", so the
//! transport is a one-method trait. Production uses reqwest; tests use
//! a scripted transport with canned bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;

use crate::error::{Error, Result};

/// Transport contract for read-only JSON endpoints.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the response body of a successful response.
    async fn get(&self, url: &str) -> Result<String>;
}

/// Production transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pairwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String> {
        trace!(url = %url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
