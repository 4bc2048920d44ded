//! Configuration structures and loading logic.

use crate::config::modes::TransferStrategy;
use crate::error::{Error, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin serving `/search`, `/trending`, `/download` and `/preview`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout for JSON endpoints.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Download behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Transfer strategy used for every download in this process.
    #[serde(default)]
    pub strategy: TransferStrategy,

    /// Directory files are saved into.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Interval between synthetic progress ticks.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Percentage added on each synthetic tick.
    #[serde(default = "default_tick_step")]
    pub tick_step: u64,

    /// Synthetic progress stops advancing once it reaches this percentage.
    #[serde(default = "default_settle_percent")]
    pub settle_percent: u64,

    /// How long a settled synthetic bar stays visible before hiding.
    #[serde(default = "default_hide_delay")]
    pub hide_delay_millis: u64,

    /// A navigational handoff is dropped if the server has not started
    /// responding within this many seconds.
    #[serde(default = "default_handoff_timeout")]
    pub handoff_timeout_seconds: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            strategy: TransferStrategy::default(),
            directory: None,
            tick_millis: default_tick_millis(),
            tick_step: default_tick_step(),
            settle_percent: default_settle_percent(),
            hide_delay_millis: default_hide_delay(),
            handoff_timeout_seconds: default_handoff_timeout(),
        }
    }
}

/// Offline asset cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache name, including its version token (e.g. `flux-v2`).
    #[serde(default = "default_cache_name")]
    pub name: String,

    /// Static assets populated on install.
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,

    /// Root of the on-disk cache store.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Keep the cache in memory only.
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: default_cache_name(),
            manifest: default_manifest(),
            directory: None,
            in_memory: false,
        }
    }
}

/// Result rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Results longer than this get a video preview, others audio.
    #[serde(default = "default_preview_threshold")]
    pub preview_threshold_seconds: u64,

    /// Thumbnail used when a result carries none.
    #[serde(default = "default_placeholder")]
    pub placeholder_thumbnail: String,

    /// Host of the external watch page.
    #[serde(default = "default_video_host")]
    pub video_host: String,

    /// Whether to add the external preview link to each result.
    #[serde(default = "default_true")]
    pub show_preview_link: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            preview_threshold_seconds: default_preview_threshold(),
            placeholder_thumbnail: default_placeholder(),
            video_host: default_video_host(),
            show_preview_link: true,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_user_agent() -> String {
    format!("flux-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    12
}

fn default_tick_millis() -> u64 {
    200
}

fn default_tick_step() -> u64 {
    8
}

fn default_settle_percent() -> u64 {
    95
}

fn default_hide_delay() -> u64 {
    2000
}

fn default_handoff_timeout() -> u64 {
    60
}

fn default_cache_name() -> String {
    "flux-v2".to_string()
}

fn default_manifest() -> Vec<String> {
    [
        "/",
        "/style.css",
        "/scripts.js",
        "/index.html",
        "/logo.jpg",
        "/manifest.json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_preview_threshold() -> u64 {
    600
}

fn default_placeholder() -> String {
    "https://via.placeholder.com/480x360".to_string()
}

fn default_video_host() -> String {
    "https://www.youtube.com".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.download
            .directory
            .clone()
            .or_else(|| UserDirs::new().and_then(|d| d.download_dir().map(Path::to_path_buf)))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the effective on-disk cache root.
    pub fn cache_directory(&self) -> PathBuf {
        self.cache
            .directory
            .clone()
            .or_else(|| {
                ProjectDirs::from("", "", "flux").map(|d| d.cache_dir().join("offline"))
            })
            .unwrap_or_else(|| PathBuf::from(".flux-cache"))
    }
}
