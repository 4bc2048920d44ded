//! Streaming transfers for media downloads.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header;
use url::Url;

use crate::error::{Error, Result};
use crate::net::fetch::NetworkFetch;

/// An open streaming response.
pub struct Transfer {
    /// Body length, when the server announced one.
    pub total: Option<u64>,
    pub content_disposition: Option<String>,
    pub body: BoxStream<'static, Result<Vec<u8>>>,
}

/// Opens streaming GET requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, url: &Url) -> Result<Transfer>;
}

#[async_trait]
impl Transport for NetworkFetch {
    async fn open(&self, url: &Url) -> Result<Transfer> {
        let response = self.stream(url).await?;

        let total = response.content_length();
        let content_disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| Error::Download(format!("Stream error: {}", e)))
            })
            .boxed();

        Ok(Transfer {
            total,
            content_disposition,
            body,
        })
    }
}
