//! Configuration module for the flux client.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Transfer strategy selection
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{BackendConfig, CacheConfig, Config, DownloadConfig, RenderConfig};
pub use modes::TransferStrategy;
pub use validation::validate_config;
