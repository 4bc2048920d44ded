//! Offline cache worker.
//!
//! This module provides:
//! - The versioned asset manifest
//! - Cache storage backends (in-memory and on-disk)
//! - The cache-first fetch interceptor with its install state machine
//!
//! The worker never calls into page code. Callers reach it only by routing
//! their fetches through it, and it answers only from its cache store or the
//! network.

pub mod manifest;
pub mod storage;
pub mod worker;

pub use manifest::CacheManifest;
pub use storage::{CacheStorage, InMemoryCacheStorage, OnDiskCacheStorage};
pub use worker::{OfflineCacheWorker, WorkerState};
