//! API response type definitions.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Response body of `/search` and `/trending`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Missing and `null` both mean "no results". Malformed entries are
    /// dropped one by one.
    #[serde(default, deserialize_with = "skip_malformed_results")]
    pub results: Vec<SearchResult>,
}

/// A single search or trending entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Canonical media identifier.
    pub id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,

    #[serde(default)]
    pub thumbnail: Option<String>,

    /// Length in seconds; `None` for live or unknown streams.
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration: Option<u64>,
}

impl SearchResult {
    /// Duration with zero folded into "unknown".
    pub fn known_duration(&self) -> Option<u64> {
        self.duration.filter(|d| *d > 0)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn skip_malformed_results<'de, D>(deserializer: D) -> Result<Vec<SearchResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<SearchResult>(entry) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Skipping malformed result: {}", e);
                None
            }
        })
        .collect())
}

// Backends report durations as integers, floats, numeric strings or null.
fn lenient_duration<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok().and_then(|f| {
            if f >= 0.0 {
                Some(f as u64)
            } else {
                None
            }
        }),
        _ => None,
    })
}

/// Download container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp3,
    Mp4,
}

impl MediaFormat {
    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Mp4 => "mp4",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "MP3",
            MediaFormat::Mp4 => "MP4",
        }
    }

    /// Content type of the downloaded file.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "audio/mpeg",
            MediaFormat::Mp4 => "video/mp4",
        }
    }

    pub fn all() -> [MediaFormat; 2] {
        [MediaFormat::Mp3, MediaFormat::Mp4]
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(MediaFormat::Mp3),
            "mp4" => Ok(MediaFormat::Mp4),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Inline preview media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Audio,
    Video,
}

impl PreviewKind {
    /// Pick the preview kind for a duration; unknown durations never exceed the threshold.
    pub fn for_duration(duration: Option<u64>, threshold: u64) -> Self {
        match duration {
            Some(d) if d > threshold => PreviewKind::Video,
            _ => PreviewKind::Audio,
        }
    }

    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewKind::Audio => "audio",
            PreviewKind::Video => "video",
        }
    }

    /// MIME type announced on the media source.
    pub fn mime(&self) -> &'static str {
        match self {
            PreviewKind::Audio => "audio/mpeg",
            PreviewKind::Video => "video/mp4",
        }
    }
}

impl fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
