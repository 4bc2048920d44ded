//! Cache-first fetch interceptor with an install step.

use std::sync::RwLock;

use async_trait::async_trait;
use futures::future::try_join_all;
use url::Url;

use super::manifest::CacheManifest;
use super::storage::CacheStorage;
use crate::error::{Error, Result};
use crate::net::{Fetch, FetchResponse};

/// Lifecycle of the worker for one cache epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Manifest not yet stored; fetches go to the network.
    Installing,
    /// Manifest stored; fetches are answered cache-first.
    Active,
    /// Last install attempt failed; fetches go to the network.
    Failed,
}

/// Serves manifest assets from a named cache and forwards everything else.
pub struct OfflineCacheWorker<F, S> {
    scope: Url,
    manifest: CacheManifest,
    network: F,
    storage: S,
    state: RwLock<WorkerState>,
}

impl<F: Fetch, S: CacheStorage> OfflineCacheWorker<F, S> {
    /// Create a worker for `scope`. It starts in [`WorkerState::Installing`].
    pub fn new(scope: Url, manifest: CacheManifest, network: F, storage: S) -> Self {
        Self {
            scope,
            manifest,
            network,
            storage,
            state: RwLock::new(WorkerState::Installing),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Fetch every manifest asset and store them all under the cache name.
    ///
    /// Any failed asset fails the whole install and nothing is stored.
    pub async fn install(&self) -> Result<()> {
        self.set_state(WorkerState::Installing);
        match self.populate().await {
            Ok(count) => {
                self.set_state(WorkerState::Active);
                tracing::info!(
                    "Offline cache {} installed ({} assets)",
                    self.manifest.cache_name(),
                    count
                );
                Ok(())
            }
            Err(e) => {
                self.set_state(WorkerState::Failed);
                Err(e)
            }
        }
    }

    async fn populate(&self) -> Result<usize> {
        let urls = self.manifest.resolve(&self.scope)?;
        self.storage.open(self.manifest.cache_name()).await?;

        let responses = try_join_all(urls.iter().map(|url| self.fetch_asset(url))).await?;
        let count = responses.len();
        self.storage
            .put_all(self.manifest.cache_name(), responses)
            .await?;
        Ok(count)
    }

    async fn fetch_asset(&self, url: &Url) -> Result<FetchResponse> {
        let response = self
            .network
            .fetch(url)
            .await
            .map_err(|e| Error::AssetInstall {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        if !response.is_success() {
            return Err(Error::AssetInstall {
                url: url.to_string(),
                message: format!("HTTP {}", response.status),
            });
        }
        Ok(FetchResponse {
            url: url.to_string(),
            ..response
        })
    }

    /// Become active straight away when this epoch's cache is already
    /// complete in storage, otherwise install.
    pub async fn activate_or_install(&self) -> Result<()> {
        if self.is_cache_complete().await {
            self.set_state(WorkerState::Active);
            tracing::debug!(
                "Offline cache {} already installed",
                self.manifest.cache_name()
            );
            return Ok(());
        }
        self.install().await
    }

    async fn is_cache_complete(&self) -> bool {
        let Ok(urls) = self.manifest.resolve(&self.scope) else {
            return false;
        };
        for url in urls {
            match self
                .storage
                .match_url(self.manifest.cache_name(), url.as_str())
                .await
            {
                Ok(Some(_)) => {}
                _ => return false,
            }
        }
        true
    }

    /// Answer a request cache-first.
    ///
    /// Misses are forwarded to the network unchanged and never written back.
    pub async fn handle_fetch(&self, url: &Url) -> Result<FetchResponse> {
        if self.state() == WorkerState::Active {
            match self
                .storage
                .match_url(self.manifest.cache_name(), url.as_str())
                .await
            {
                Ok(Some(hit)) => {
                    tracing::debug!("Cache hit: {}", url);
                    return Ok(hit);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Cache lookup for {} failed: {}", url, e),
            }
        }
        self.network.fetch(url).await
    }

    /// Caches from other epochs of this manifest. They are never removed.
    pub async fn stale_caches(&self) -> Result<Vec<String>> {
        Ok(self
            .storage
            .cache_names()
            .await?
            .into_iter()
            .filter(|name| self.manifest.is_other_epoch(name))
            .collect())
    }
}

#[async_trait]
impl<F: Fetch, S: CacheStorage> Fetch for OfflineCacheWorker<F, S> {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        self.handle_fetch(url).await
    }
}
