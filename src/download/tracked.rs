//! Tracked transfers: stream the body ourselves and report byte progress.

use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::fs::{create_unique_file, ensure_dir};
use crate::net::Transfer;
use crate::view::ProgressSurface;

/// Copy a byte stream into `writer`, reporting progress after every chunk.
///
/// Returns the number of bytes written.
pub async fn copy_with_progress<S, W>(
    mut stream: S,
    total: Option<u64>,
    progress: &ProgressSurface,
    writer: &mut W,
) -> Result<u64>
where
    S: Stream<Item = Result<Vec<u8>>> + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut loaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        loaded += chunk.len() as u64;
        progress.set_bytes(loaded, total);
    }

    writer.flush().await?;
    Ok(loaded)
}

/// Save an open transfer as `filename` inside `directory`.
///
/// A partially written file is removed when the stream fails.
pub async fn save_transfer(
    transfer: Transfer,
    directory: &Path,
    filename: &str,
    progress: &ProgressSurface,
) -> Result<PathBuf> {
    ensure_dir(directory).await?;
    let (output_path, mut file) = create_unique_file(directory, filename).await?;

    match copy_with_progress(transfer.body, transfer.total, progress, &mut file).await {
        Ok(bytes) => {
            tracing::debug!("Wrote {} bytes to {}", bytes, output_path.display());
            Ok(output_path)
        }
        Err(e) => {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                tracing::debug!(
                    "Could not remove partial file {}: {}",
                    output_path.display(),
                    remove_err
                );
            }
            Err(e)
        }
    }
}
