//! Configuration validation logic.

use std::sync::OnceLock;

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_url(&config.backend.base_url)?;
    validate_cache_name(&config.cache.name)?;
    validate_manifest(&config.cache.manifest)?;
    validate_progress(
        config.download.tick_millis,
        config.download.tick_step,
        config.download.settle_percent,
    )?;

    if config.render.preview_threshold_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "preview_threshold_seconds".to_string(),
            message: "Threshold must be greater than zero".to_string(),
        });
    }

    Ok(())
}

/// Validate the backend origin.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.trim().is_empty() {
        return Err(Error::MissingConfig("base_url".to_string()));
    }

    let url = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: format!("'{}' is not a valid URL: {}", base_url, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate that the cache name carries a version token (`<name>-v<N>`).
pub fn validate_cache_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MissingConfig("cache name".to_string()));
    }

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+-v\d+$").unwrap());
    if !pattern.is_match(name) {
        return Err(Error::ConfigValidation {
            field: "cache.name".to_string(),
            message: format!(
                "Cache name '{}' must end with a version token such as '-v2'",
                name
            ),
        });
    }

    Ok(())
}

/// Validate manifest entries.
pub fn validate_manifest<S: AsRef<str>>(manifest: &[S]) -> Result<()> {
    if manifest.is_empty() {
        return Err(Error::MissingConfig(
            "cache manifest (at least one asset required)".to_string(),
        ));
    }

    for entry in manifest {
        let entry = entry.as_ref();
        let absolute = entry.starts_with("http://") || entry.starts_with("https://");

        if !(entry.starts_with('/') || absolute) {
            return Err(Error::ConfigValidation {
                field: "cache.manifest".to_string(),
                message: format!(
                    "Asset '{}' must be a root-relative path or an http(s) URL",
                    entry
                ),
            });
        }

        if absolute && Url::parse(entry).is_err() {
            return Err(Error::ConfigValidation {
                field: "cache.manifest".to_string(),
                message: format!("Asset '{}' is not a valid URL", entry),
            });
        }
    }

    Ok(())
}

/// Validate synthetic progress settings.
pub fn validate_progress(tick_millis: u64, tick_step: u64, settle_percent: u64) -> Result<()> {
    if tick_millis == 0 {
        return Err(Error::ConfigValidation {
            field: "download.tick_millis".to_string(),
            message: "Tick interval must be greater than zero".to_string(),
        });
    }

    if !(1..=100).contains(&tick_step) {
        return Err(Error::ConfigValidation {
            field: "download.tick_step".to_string(),
            message: format!("Tick step must be between 1 and 100 (got {})", tick_step),
        });
    }

    if !(1..=100).contains(&settle_percent) {
        return Err(Error::ConfigValidation {
            field: "download.settle_percent".to_string(),
            message: format!(
                "Settle percentage must be between 1 and 100 (got {})",
                settle_percent
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_base_url() {
        assert!(validate_base_url("https://flux.onrender.com").is_ok());
        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("ftp://flux.example").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn test_cache_name_requires_version() {
        assert!(validate_cache_name("flux-v1").is_ok());
        assert!(validate_cache_name("flux-v12").is_ok());
        assert!(validate_cache_name("flux").is_err());
        assert!(validate_cache_name("flux-vx").is_err());
    }

    #[test]
    fn test_manifest_entries() {
        assert!(validate_manifest(&["/", "/style.css"]).is_ok());
        assert!(validate_manifest(&["https://cdn.example/app.css"]).is_ok());
        assert!(validate_manifest::<&str>(&[]).is_err());
        assert!(validate_manifest(&["style.css"]).is_err());
    }

    #[test]
    fn test_progress_bounds() {
        assert!(validate_progress(200, 8, 95).is_ok());
        assert!(validate_progress(0, 8, 95).is_err());
        assert!(validate_progress(200, 0, 95).is_err());
        assert!(validate_progress(200, 8, 101).is_err());
    }
}
