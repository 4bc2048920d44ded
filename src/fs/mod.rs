//! Filesystem module.
//!
//! Provides:
//! - Save path resolution for downloads
//! - Filename derivation and sanitization

pub mod naming;
pub mod paths;

pub use naming::{
    filename_from_disposition, media_filename, numbered_filename, sanitize_filename,
};
pub use paths::{create_unique_file, ensure_dir};
