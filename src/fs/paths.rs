//! Save path resolution.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};

use crate::error::{Error, Result};
use crate::fs::naming::{numbered_filename, sanitize_filename};

const MAX_SUFFIX: u32 = 1000;

/// Create a new file for `filename` inside `dir` without clobbering anything.
///
/// The name is taken with `create_new`, so concurrent savers asking for the
/// same name each get their own file (`Mix.mp3`, `Mix_1.mp3`, ...).
pub async fn create_unique_file(dir: &Path, filename: &str) -> Result<(PathBuf, File)> {
    let filename = sanitize_filename(filename)?;

    for n in 0..=MAX_SUFFIX {
        let path = dir.join(numbered_filename(&filename, n));
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(Error::Download(format!(
        "No free file name for {} in {}",
        filename,
        dir.display()
    )))
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
