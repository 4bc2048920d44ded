//! Turns search results into result blocks.

use crate::api::client::Endpoints;
use crate::api::{MediaFormat, PreviewKind, SearchResult};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::render::format::format_duration;
use crate::view::{Container, Control, Preview, ProgressSurface, ResultBlock, ViewState};

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Results strictly longer than this get a video preview.
    pub preview_threshold: u64,
    pub placeholder_thumbnail: String,
    /// Origin of the external watch page.
    pub video_host: String,
    pub show_preview_link: bool,
    /// Shown instead of an empty container.
    pub no_results_message: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            preview_threshold: config.preview_threshold_seconds,
            placeholder_thumbnail: config.placeholder_thumbnail.clone(),
            video_host: config.video_host.trim_end_matches('/').to_string(),
            show_preview_link: config.show_preview_link,
            no_results_message: "No results found.".to_string(),
        }
    }
}

/// Result renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    endpoints: Endpoints,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(endpoints: Endpoints, options: RenderOptions) -> Self {
        Self { endpoints, options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replace the container content with the given results.
    ///
    /// An empty list renders the "no results" message.
    pub fn render(&self, results: &[SearchResult], container: &Container) {
        self.render_with_empty_message(results, container, &self.options.no_results_message);
    }

    /// Like [`Renderer::render`], with a caller-chosen empty message.
    pub fn render_with_empty_message(
        &self,
        results: &[SearchResult],
        container: &Container,
        empty_message: &str,
    ) {
        if results.is_empty() {
            container.replace(ViewState::Empty(empty_message.to_string()));
            return;
        }

        let mut blocks = Vec::with_capacity(results.len());
        for result in results {
            match self.block(result) {
                Ok(block) => blocks.push(block),
                Err(e) => tracing::warn!("Skipping result {}: {}", result.id, e),
            }
        }

        if blocks.is_empty() {
            container.replace(ViewState::Empty(empty_message.to_string()));
        } else {
            container.replace(ViewState::Results(blocks));
        }
    }

    /// Build the block for one result.
    pub fn block(&self, result: &SearchResult) -> Result<ResultBlock> {
        let duration = result.known_duration();
        let kind = PreviewKind::for_duration(duration, self.options.preview_threshold);

        let thumbnail = result
            .thumbnail
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.options.placeholder_thumbnail.as_str())
            .to_string();

        let preview = Preview {
            kind,
            src: self.endpoints.preview(&result.id, kind)?.to_string(),
            poster: match kind {
                PreviewKind::Video => Some(thumbnail.clone()),
                PreviewKind::Audio => None,
            },
        };

        let mut controls = Vec::with_capacity(3);
        for format in MediaFormat::all() {
            controls.push(Control::Download {
                format,
                href: self.endpoints.download(&result.id, format)?.to_string(),
            });
        }
        if self.options.show_preview_link {
            controls.push(Control::ExternalPreview {
                href: self.watch_url(&result.id)?,
            });
        }

        Ok(ResultBlock {
            id: result.id.clone(),
            title: result.title.clone(),
            author: result.author.clone(),
            duration_label: format_duration(duration),
            thumbnail,
            preview,
            controls,
            progress: ProgressSurface::new(),
        })
    }

    /// `https://<video-host>/watch?v=<id>`
    pub fn watch_url(&self, id: &str) -> Result<String> {
        let mut url = url::Url::parse(&format!("{}/watch", self.options.video_host))?;
        url.query_pairs_mut().append_pair("v", id);
        Ok(url.to_string())
    }
}
