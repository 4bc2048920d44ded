use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{check_cache_name, CacheStorage};
use crate::error::Result;
use crate::net::FetchResponse;

/// Stored next to each body as `<key>.json`.
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    content_type: Option<String>,
    content_disposition: Option<String>,
    cached_at: DateTime<Utc>,
}

/// Cache store persisted under a root directory, one subdirectory per cache.
///
/// Each entry is a `<md5(url)>.body` file plus a `<md5(url)>.json` metadata
/// file. Writes are staged in a hidden directory and swapped in with a rename,
/// so a cache never shows a partial batch.
#[derive(Debug, Clone)]
pub struct OnDiskCacheStorage {
    root: PathBuf,
}

impl OnDiskCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn cache_dir(&self, cache_name: &str) -> PathBuf {
        self.root.join(cache_name)
    }

    fn entry_key(url: &str) -> String {
        format!("{:x}", Md5::digest(url.as_bytes()))
    }

    async fn write_entry(dir: &Path, entry: &FetchResponse) -> Result<()> {
        let key = Self::entry_key(&entry.url);
        let content_type = entry.content_type.clone().or_else(|| {
            Url::parse(&entry.url).ok().and_then(|url| {
                mime_guess::from_path(url.path())
                    .first_raw()
                    .map(str::to_string)
            })
        });
        let meta = EntryMeta {
            url: entry.url.clone(),
            status: entry.status,
            content_type,
            content_disposition: entry.content_disposition.clone(),
            cached_at: Utc::now(),
        };

        tokio::fs::write(dir.join(format!("{}.body", key)), &entry.body).await?;
        tokio::fs::write(
            dir.join(format!("{}.json", key)),
            serde_json::to_vec_pretty(&meta)?,
        )
        .await?;
        Ok(())
    }

    async fn copy_dir_files(from: &Path, to: &Path) -> Result<()> {
        let mut reader = match tokio::fs::read_dir(from).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        while let Some(item) = reader.next_entry().await? {
            if item.file_type().await?.is_file() {
                tokio::fs::copy(item.path(), to.join(item.file_name())).await?;
            }
        }
        Ok(())
    }

    async fn stage(&self, staging: &Path, cache_name: &str, entries: &[FetchResponse]) -> Result<()> {
        tokio::fs::create_dir_all(staging).await?;
        Self::copy_dir_files(&self.cache_dir(cache_name), staging).await?;
        for entry in entries {
            Self::write_entry(staging, entry).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for OnDiskCacheStorage {
    async fn open(&self, cache_name: &str) -> Result<()> {
        check_cache_name(cache_name)?;
        tokio::fs::create_dir_all(self.cache_dir(cache_name)).await?;
        Ok(())
    }

    async fn put_all(&self, cache_name: &str, entries: Vec<FetchResponse>) -> Result<()> {
        check_cache_name(cache_name)?;
        tokio::fs::create_dir_all(&self.root).await?;

        let staging = self.root.join(format!(".staging-{}", Uuid::new_v4()));
        if let Err(e) = self.stage(&staging, cache_name, &entries).await {
            let _ = tokio::fs::remove_dir_all(&staging).await;
            return Err(e);
        }

        let target = self.cache_dir(cache_name);
        let retired = self.root.join(format!(".retired-{}", Uuid::new_v4()));
        let had_previous = match tokio::fs::rename(&target, &retired).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&staging).await;
                return Err(e.into());
            }
        };

        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            if had_previous {
                let _ = tokio::fs::rename(&retired, &target).await;
            }
            let _ = tokio::fs::remove_dir_all(&staging).await;
            return Err(e.into());
        }

        if had_previous {
            if let Err(e) = tokio::fs::remove_dir_all(&retired).await {
                tracing::debug!("Could not remove {}: {}", retired.display(), e);
            }
        }

        tracing::debug!(
            "Stored {} entries in cache {} at {}",
            entries.len(),
            cache_name,
            target.display()
        );
        Ok(())
    }

    async fn match_url(&self, cache_name: &str, url: &str) -> Result<Option<FetchResponse>> {
        if check_cache_name(cache_name).is_err() {
            return Ok(None);
        }
        let dir = self.cache_dir(cache_name);
        let key = Self::entry_key(url);

        let raw_meta = match tokio::fs::read(dir.join(format!("{}.json", key))).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: EntryMeta = serde_json::from_slice(&raw_meta)?;
        if meta.url != url {
            return Ok(None);
        }

        let body = match tokio::fs::read(dir.join(format!("{}.body", key))).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(FetchResponse {
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            content_disposition: meta.content_disposition,
            body,
        }))
    }

    async fn cache_names(&self) -> Result<Vec<String>> {
        let mut reader = match tokio::fs::read_dir(&self.root).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(item) = reader.next_entry().await? {
            let name = item.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') && item.file_type().await?.is_dir() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
