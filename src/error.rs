//! Error types for the flux client.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Backend errors
    #[error("Network failure for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Unexpected response from {url}: {message}")]
    Parse { url: String, message: String },

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    // Offline cache errors
    #[error("Failed to install cache asset {url}: {message}")]
    AssetInstall { url: String, message: String },

    #[error("Cache storage error: {0}")]
    CacheStorage(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build a network failure for a URL.
    pub fn network(url: impl ToString, message: impl ToString) -> Self {
        Error::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Build a parse failure for a URL.
    pub fn parse(url: impl ToString, message: impl ToString) -> Self {
        Error::Parse {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes for the `flux` binary.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const NETWORK_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const CACHE_ERROR: i32 = 6;
}
