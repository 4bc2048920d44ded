//! flux-client - a client for a media search and download service.
//!
//! This library turns backend search results into renderable view state,
//! starts downloads with per-result progress, and keeps the app's static
//! assets available offline through a cache-first worker.
//!
//! # Features
//!
//! - Search and trending queries with loading, empty and failure states
//! - Result blocks with inline audio or video previews
//! - Tracked (byte progress) and navigational (synthetic progress) downloads
//! - Versioned offline asset cache, in memory or on disk
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use flux_client::{
//!     api::{client::Endpoints, BackendClient},
//!     net::NetworkFetch,
//!     query::QueryController,
//!     render::{RenderOptions, Renderer},
//!     view::Container,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoints = Endpoints::new("http://localhost:5000")?;
//!     let network = NetworkFetch::new("flux-client", Duration::from_secs(12))?;
//!     let controller = QueryController::new(
//!         BackendClient::new(endpoints.clone(), network),
//!         Renderer::new(endpoints, RenderOptions::default()),
//!         Container::new("results"),
//!         Container::new("trending"),
//!     );
//!
//!     controller.run_search("amapiano").await;
//!     println!("{}", controller.results().to_html());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod net;
pub mod output;
pub mod query;
pub mod render;
pub mod view;
pub mod worker;

// Re-exports for convenience
pub use api::{BackendClient, MediaFormat, PreviewKind, SearchResult};
pub use config::{Config, TransferStrategy};
pub use download::{DownloadInitiator, DownloadOutcome, DownloadRequest};
pub use error::{Error, Result};
pub use query::QueryController;
pub use view::{Container, ViewState};
pub use worker::{OfflineCacheWorker, WorkerState};
