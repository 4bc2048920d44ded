//! Markup projection of the view state.

use std::fmt::Write;

use crate::api::PreviewKind;
use crate::render::format::escape_html;
use crate::view::state::{Control, ResultBlock, ViewState};

impl ViewState {
    /// Markup for the container content. Every interpolated value is escaped.
    pub fn to_html(&self) -> String {
        match self {
            ViewState::Idle => String::new(),
            ViewState::Loading(message) => {
                format!(r#"<p class="loading">{}</p>"#, escape_html(message))
            }
            ViewState::Empty(message) => {
                format!(r#"<p class="empty">{}</p>"#, escape_html(message))
            }
            ViewState::Failed(message) => {
                format!(r#"<p class="error">{}</p>"#, escape_html(message))
            }
            ViewState::Results(blocks) => blocks.iter().map(block_html).collect(),
        }
    }
}

fn block_html(block: &ResultBlock) -> String {
    let id = escape_html(&block.id);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<div class="result" data-id="{id}">
  <img src="{thumb}" class="thumbnail" loading="lazy" alt="">
  <h3>{title}</h3>
  <p>{author} • {duration}</p>
"#,
        thumb = escape_html(&block.thumbnail),
        title = escape_html(&block.title),
        author = escape_html(&block.author),
        duration = escape_html(&block.duration_label),
    );

    let src = escape_html(&block.preview.src);
    let mime = block.preview.kind.mime();
    match block.preview.kind {
        PreviewKind::Video => {
            let poster = block
                .preview
                .poster
                .as_deref()
                .map(|p| format!(r#" poster="{}""#, escape_html(p)))
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"  <video controls preload="none"{poster}>
    <source src="{src}" type="{mime}">
  </video>
"#
            );
        }
        PreviewKind::Audio => {
            let _ = write!(
                html,
                r#"  <audio controls preload="none">
    <source src="{src}" type="{mime}">
  </audio>
"#
            );
        }
    }

    html.push_str("  <div class=\"buttons\">\n");
    for control in &block.controls {
        match control {
            Control::Download { format, href } => {
                let _ = writeln!(
                    html,
                    r#"    <button class="download-btn {ext}" data-id="{id}" data-href="{href}">{label}</button>"#,
                    ext = format.extension(),
                    href = escape_html(href),
                    label = format.label(),
                );
            }
            Control::ExternalPreview { href } => {
                let _ = writeln!(
                    html,
                    r#"    <a class="download-btn preview" href="{}" target="_blank" rel="noopener">Preview</a>"#,
                    escape_html(href)
                );
            }
        }
    }
    html.push_str("  </div>\n");

    let progress = block.progress.snapshot();
    let _ = write!(
        html,
        r#"  <progress class="progress" value="{}" max="100"{}></progress>
</div>
"#,
        progress.value,
        if progress.visible { "" } else { " hidden" }
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MediaFormat;
    use crate::view::state::Preview;
    use crate::view::ProgressSurface;

    fn block(kind: PreviewKind) -> ResultBlock {
        ResultBlock {
            id: "abc".to_string(),
            title: "<b>Mix</b>".to_string(),
            author: "Tom & \"Jerry\"".to_string(),
            duration_label: "4:05".to_string(),
            thumbnail: "https://i.example/abc.jpg".to_string(),
            preview: Preview {
                kind,
                src: "http://localhost:5000/preview?id=abc&type=audio".to_string(),
                poster: Some("https://i.example/abc.jpg".to_string()),
            },
            controls: vec![
                Control::Download {
                    format: MediaFormat::Mp3,
                    href: "http://localhost:5000/download?id=abc&format=mp3".to_string(),
                },
                Control::ExternalPreview {
                    href: "https://www.youtube.com/watch?v=abc".to_string(),
                },
            ],
            progress: ProgressSurface::new(),
        }
    }

    #[test]
    fn test_message_states() {
        assert_eq!(ViewState::Idle.to_html(), "");
        assert_eq!(
            ViewState::Loading("Searching...".into()).to_html(),
            r#"<p class="loading">Searching...</p>"#
        );
        assert!(ViewState::Empty("No results found.".into())
            .to_html()
            .contains("No results found."));
    }

    #[test]
    fn test_untrusted_text_is_escaped() {
        let html = ViewState::Results(vec![block(PreviewKind::Audio)]).to_html();
        assert!(html.contains("<h3>&lt;b&gt;Mix&lt;/b&gt;</h3>"));
        assert!(html.contains("Tom &amp; &quot;Jerry&quot;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("id=abc&amp;type=audio"));
    }

    #[test]
    fn test_media_elements_defer_loading() {
        let audio = ViewState::Results(vec![block(PreviewKind::Audio)]).to_html();
        assert!(audio.contains(r#"<audio controls preload="none">"#));
        assert!(!audio.contains("<video"));

        let video = ViewState::Results(vec![block(PreviewKind::Video)]).to_html();
        assert!(video.contains(r#"<video controls preload="none" poster="#));
        assert!(video.contains(r#"type="video/mp4""#));
    }

    #[test]
    fn test_progress_hidden_until_started() {
        let block = block(PreviewKind::Audio);
        let html = ViewState::Results(vec![block.clone()]).to_html();
        assert!(html.contains(r#"value="0" max="100" hidden"#));

        block.progress.start();
        block.progress.set_percent(40);
        let html = ViewState::Results(vec![block]).to_html();
        assert!(html.contains(r#"value="40" max="100">"#));
    }
}
