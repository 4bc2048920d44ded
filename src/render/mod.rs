//! Result rendering.
//!
//! Provides:
//! - Duration and text formatting helpers
//! - The renderer turning search results into view state

pub mod format;
pub mod renderer;

pub use format::{encode_query, escape_html, format_duration, unescape_html};
pub use renderer::{RenderOptions, Renderer};
