//! Named cache stores keyed by request URL.

mod disk;
mod memory;

pub use disk::OnDiskCacheStorage;
pub use memory::InMemoryCacheStorage;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::net::FetchResponse;

/// Storage for named caches of URL -> response pairs.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open (or create) the named cache.
    async fn open(&self, cache_name: &str) -> Result<()>;

    /// Store every entry, or none of them.
    async fn put_all(&self, cache_name: &str, entries: Vec<FetchResponse>) -> Result<()>;

    /// Look up a stored response by exact URL.
    async fn match_url(&self, cache_name: &str, url: &str) -> Result<Option<FetchResponse>>;

    /// Names of every cache in the store.
    async fn cache_names(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: CacheStorage + ?Sized> CacheStorage for Arc<S> {
    async fn open(&self, cache_name: &str) -> Result<()> {
        (**self).open(cache_name).await
    }

    async fn put_all(&self, cache_name: &str, entries: Vec<FetchResponse>) -> Result<()> {
        (**self).put_all(cache_name, entries).await
    }

    async fn match_url(&self, cache_name: &str, url: &str) -> Result<Option<FetchResponse>> {
        (**self).match_url(cache_name, url).await
    }

    async fn cache_names(&self) -> Result<Vec<String>> {
        (**self).cache_names().await
    }
}

/// Cache names double as directory names, so keep them to one plain path segment.
pub(crate) fn check_cache_name(cache_name: &str) -> Result<()> {
    let valid = !cache_name.is_empty()
        && !cache_name.starts_with('.')
        && cache_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::CacheStorage(format!(
            "Invalid cache name: {}",
            cache_name
        )))
    }
}
