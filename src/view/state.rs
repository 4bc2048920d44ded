//! View state types.

use crate::api::{MediaFormat, PreviewKind};
use crate::view::progress::ProgressSurface;

/// Whole content of a container.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// Nothing rendered yet.
    #[default]
    Idle,
    Loading(String),
    /// Well-formed response with no items.
    Empty(String),
    Failed(String),
    Results(Vec<ResultBlock>),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading(_))
    }

    /// Rendered result blocks, empty for every other state.
    pub fn blocks(&self) -> &[ResultBlock] {
        match self {
            ViewState::Results(blocks) => blocks,
            _ => &[],
        }
    }

    /// Status line for message states.
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Loading(m) | ViewState::Empty(m) | ViewState::Failed(m) => Some(m),
            _ => None,
        }
    }
}

/// Inline preview element. Never loads before user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub kind: PreviewKind,
    pub src: String,
    /// Poster frame, video previews only.
    pub poster: Option<String>,
}

/// An action exposed on a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Download { format: MediaFormat, href: String },
    /// Link to the original source, opened in a new browsing context.
    ExternalPreview { href: String },
}

impl Control {
    pub fn download_format(&self) -> Option<MediaFormat> {
        match self {
            Control::Download { format, .. } => Some(*format),
            Control::ExternalPreview { .. } => None,
        }
    }
}

/// One rendered search result.
///
/// Text fields hold the raw backend strings; they are escaped when the
/// block is turned into markup.
#[derive(Debug, Clone)]
pub struct ResultBlock {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_label: String,
    pub thumbnail: String,
    pub preview: Preview,
    pub controls: Vec<Control>,
    pub progress: ProgressSurface,
}

impl ResultBlock {
    /// Formats offered by the download controls, in display order.
    pub fn download_formats(&self) -> Vec<MediaFormat> {
        self.controls
            .iter()
            .filter_map(Control::download_format)
            .collect()
    }
}
