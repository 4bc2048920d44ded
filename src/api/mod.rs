//! Flux backend API module.
//!
//! This module provides:
//! - Typed client for the search, trending, download and preview endpoints
//! - Response and media type definitions

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;
