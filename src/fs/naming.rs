//! Filename generation and manipulation.

use std::path::Path;

use crate::api::MediaFormat;
use crate::error::{Error, Result};

/// Longest stem kept from a media title.
const MAX_STEM_CHARS: usize = 150;

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Derive `<title>.<ext>` for a download.
///
/// Titles are untrusted: separators and traversal sequences are folded into
/// underscores instead of rejected, and an unusable title falls back to the id.
pub fn media_filename(title: &str, id: &str, format: MediaFormat) -> String {
    let mut stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_STEM_CHARS)
        .collect();
    while stem.contains("..") {
        stem = stem.replace("..", "_");
    }
    let stem = stem.trim().trim_matches('.');

    let stem = if stem.is_empty() { id } else { stem };
    format!("{}.{}", stem, format.extension())
}

/// Extract the filename from a `Content-Disposition` header value.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    // RFC 5987 form takes precedence: filename*=UTF-8''name.mp3
    for part in header.split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix("filename*=") {
            let encoded = value.splitn(3, '\'').nth(2).unwrap_or(value);
            let decoded: String = url::form_urlencoded::parse(format!("n={}", encoded).as_bytes())
                .next()
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            if !decoded.is_empty() {
                return Some(decoded);
            }
        }
    }

    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|value| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// The `n`th candidate name for `filename`: `Mix.mp3`, `Mix_1.mp3`, `Mix_2.mp3`, ...
pub fn numbered_filename(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    }
}
