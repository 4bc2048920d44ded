//! Fetch abstraction and the reqwest-backed network implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Final URL of the response.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with a network error unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::network(&self.url, format!("HTTP {}", self.status)))
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::parse(&self.url, e))
    }
}

/// Something that can answer a GET request for a URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for Arc<F> {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        (**self).fetch(url).await
    }
}

/// Plain network access through reqwest.
#[derive(Debug, Clone)]
pub struct NetworkFetch {
    client: Client,
    timeout: Duration,
}

impl NetworkFetch {
    /// Create a client with the given user agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Start a streaming GET, failing on non-2xx statuses.
    ///
    /// No timeout is applied: media transfers can legitimately take minutes.
    pub async fn stream(&self, url: &Url) -> Result<Response> {
        tracing::debug!("GET {} (stream)", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::network(url, e))?;

        if !response.status().is_success() {
            return Err(Error::network(url, format!("HTTP {}", response.status())));
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetch for NetworkFetch {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::network(url, e))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_value(header::CONTENT_TYPE);
        let content_disposition = header_value(header::CONTENT_DISPOSITION);
        let final_url = response.url().to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::network(url, e))?
            .to_vec();

        Ok(FetchResponse {
            url: final_url,
            status: status.as_u16(),
            content_type,
            content_disposition,
            body,
        })
    }
}
