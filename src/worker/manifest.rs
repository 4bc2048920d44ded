//! Versioned asset manifest.

use url::Url;

use crate::config::CacheConfig;
use crate::error::{Error, Result};

/// Fixed list of assets plus the versioned cache name they live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    cache_name: String,
    urls: Vec<String>,
}

impl CacheManifest {
    pub fn new(cache_name: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            urls,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Version token of the cache name (`flux-v2` -> 2).
    pub fn version(&self) -> Option<u32> {
        let (_, version) = self.cache_name.rsplit_once("-v")?;
        version.parse().ok()
    }

    /// Cache name without its version token (`flux-v2` -> `flux`).
    pub fn family(&self) -> &str {
        match self.cache_name.rsplit_once("-v") {
            Some((family, version)) if version.parse::<u32>().is_ok() => family,
            _ => &self.cache_name,
        }
    }

    /// Whether another cache name belongs to an earlier or later epoch of this manifest.
    pub fn is_other_epoch(&self, cache_name: &str) -> bool {
        if cache_name == self.cache_name {
            return false;
        }
        let other = CacheManifest::new(cache_name, Vec::new());
        other.version().is_some() && other.family() == self.family()
    }

    /// Resolve every entry against the worker scope.
    pub fn resolve(&self, scope: &Url) -> Result<Vec<Url>> {
        self.urls
            .iter()
            .map(|entry| {
                scope.join(entry).map_err(|e| Error::AssetInstall {
                    url: entry.clone(),
                    message: format!("Cannot resolve against {}: {}", scope, e),
                })
            })
            .collect()
    }
}

impl From<&CacheConfig> for CacheManifest {
    fn from(config: &CacheConfig) -> Self {
        CacheManifest::new(config.name.clone(), config.manifest.clone())
    }
}
