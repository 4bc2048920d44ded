//! Flux backend HTTP client.

use url::Url;

use crate::api::types::*;
use crate::error::{Error, Result};
use crate::net::Fetch;
use crate::render::encode_query;

/// URL builder for the backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the backend origin.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// `GET /search?q=<query>`
    pub fn search(&self, query: &str) -> Result<Url> {
        let mut url = self.endpoint("/search", &[])?;
        url.set_query(Some(&format!("q={}", encode_query(query))));
        Ok(url)
    }

    /// `GET /trending`
    pub fn trending(&self) -> Result<Url> {
        self.endpoint("/trending", &[])
    }

    /// `GET /download?id=<id>&format=mp3|mp4`
    pub fn download(&self, id: &str, format: MediaFormat) -> Result<Url> {
        self.endpoint("/download", &[("id", id), ("format", format.extension())])
    }

    /// `GET /preview?id=<id>&type=audio|video`
    pub fn preview(&self, id: &str, kind: PreviewKind) -> Result<Url> {
        self.endpoint("/preview", &[("id", id), ("type", kind.as_str())])
    }
}

/// Client for the JSON endpoints.
pub struct BackendClient<F> {
    endpoints: Endpoints,
    fetcher: F,
}

impl<F: Fetch> BackendClient<F> {
    pub fn new(endpoints: Endpoints, fetcher: F) -> Self {
        Self { endpoints, fetcher }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Where a download control points.
    pub fn download_url(&self, id: &str, format: MediaFormat) -> Result<Url> {
        self.endpoints.download(id, format)
    }

    /// Where an inline preview streams from.
    pub fn preview_url(&self, id: &str, kind: PreviewKind) -> Result<Url> {
        self.endpoints.preview(id, kind)
    }

    /// Search for media matching a free-text query.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = self.endpoints.search(query)?;
        self.get_results(&url).await
    }

    /// Get the backend's trending list.
    pub async fn trending(&self) -> Result<Vec<SearchResult>> {
        let url = self.endpoints.trending()?;
        self.get_results(&url).await
    }

    async fn get_results(&self, url: &Url) -> Result<Vec<SearchResult>> {
        let response = self.fetcher.fetch(url).await?.error_for_status()?;
        tracing::debug!("Results response: {} bytes", response.body.len());

        let body: SearchResponse = response.json().map_err(|e| match e {
            Error::Parse { url, message } => {
                let preview = String::from_utf8_lossy(&response.body);
                let preview: String = preview.chars().take(200).collect();
                Error::Parse {
                    url,
                    message: format!("{} - Response: {}", message, preview),
                }
            }
            other => other,
        })?;

        Ok(body.results)
    }
}
