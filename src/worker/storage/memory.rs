use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{check_cache_name, CacheStorage};
use crate::error::Result;
use crate::net::FetchResponse;

/// Process-local cache store.
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    caches: Mutex<HashMap<String, HashMap<String, FetchResponse>>>,
}

impl InMemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HashMap<String, FetchResponse>>> {
        self.caches.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of entries in the named cache.
    pub fn len(&self, cache_name: &str) -> usize {
        self.lock().get(cache_name).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, cache_name: &str) -> Result<()> {
        check_cache_name(cache_name)?;
        self.lock().entry(cache_name.to_string()).or_default();
        Ok(())
    }

    async fn put_all(&self, cache_name: &str, entries: Vec<FetchResponse>) -> Result<()> {
        check_cache_name(cache_name)?;
        let mut caches = self.lock();
        let cache = caches.entry(cache_name.to_string()).or_default();
        for entry in entries {
            cache.insert(entry.url.clone(), entry);
        }
        Ok(())
    }

    async fn match_url(&self, cache_name: &str, url: &str) -> Result<Option<FetchResponse>> {
        Ok(self
            .lock()
            .get(cache_name)
            .and_then(|cache| cache.get(url))
            .cloned())
    }

    async fn cache_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
