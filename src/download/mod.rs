//! Download module.
//!
//! This module provides:
//! - Download task tracking, one active task per result
//! - Tracked transfers with byte-level progress
//! - Navigational handoffs with timer-driven progress
//! - Per-result click bindings

pub mod initiator;
pub mod navigational;
pub mod task;
pub mod tracked;

pub use initiator::{BoundControl, DownloadInitiator, DownloadOutcome, DownloadRequest};
pub use navigational::SyntheticProgress;
pub use task::{DownloadTask, TaskArena};
