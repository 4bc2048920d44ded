//! Navigational transfers: hand the URL off and simulate progress.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use crate::fs::{create_unique_file, ensure_dir, filename_from_disposition};
use crate::net::Transfer;
use crate::view::ProgressSurface;

/// Timer-driven progress for transfers whose real progress is not observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticProgress {
    pub tick: Duration,
    pub step: u64,
    pub settle_percent: u64,
    pub hide_delay: Duration,
}

impl Default for SyntheticProgress {
    fn default() -> Self {
        Self::from(&DownloadConfig::default())
    }
}

impl From<&DownloadConfig> for SyntheticProgress {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            tick: Duration::from_millis(config.tick_millis),
            step: config.tick_step.max(1),
            settle_percent: config.settle_percent,
            hide_delay: Duration::from_millis(config.hide_delay_millis),
        }
    }
}

impl SyntheticProgress {
    /// Advance `progress` until it settles, then hide it after the delay.
    ///
    /// Stops early, without hiding, if the indicator stops running (for
    /// example when the handoff stalls it).
    pub async fn run(&self, progress: &ProgressSurface) {
        let mut value = 0;

        while value < self.settle_percent {
            tokio::time::sleep(self.tick).await;
            if !progress.is_running() {
                return;
            }
            value += self.step;
            progress.set_percent(value);
        }

        tokio::time::sleep(self.hide_delay).await;
        if progress.is_running() {
            progress.hide();
        }
    }

    /// Time from start until the indicator hides.
    pub fn total_duration(&self) -> Duration {
        let ticks = self.settle_percent.div_ceil(self.step);
        self.tick * ticks as u32 + self.hide_delay
    }
}

/// Receive a handed-off transfer the way a browser download manager would:
/// save it under the server-provided name, without progress reporting.
pub async fn receive_handoff(
    transfer: Transfer,
    directory: &Path,
    fallback_name: &str,
) -> Result<PathBuf> {
    ensure_dir(directory).await?;

    let suggested = transfer
        .content_disposition
        .as_deref()
        .and_then(filename_from_disposition);
    let (output_path, mut file) = match suggested {
        Some(name) => match create_unique_file(directory, &name).await {
            Err(Error::InvalidFilename(reason)) => {
                tracing::debug!("Ignoring server filename: {}", reason);
                create_unique_file(directory, fallback_name).await?
            }
            other => other?,
        },
        None => create_unique_file(directory, fallback_name).await?,
    };
    let mut body = transfer.body;
    let mut failure = None;
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(bytes) => file.write_all(&bytes).await?,
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    if let Some(e) = failure {
        drop(file);
        let _ = tokio::fs::remove_file(&output_path).await;
        return Err(Error::Download(format!(
            "Handoff for {} failed: {}",
            output_path.display(),
            e
        )));
    }

    file.flush().await?;
    Ok(output_path)
}
