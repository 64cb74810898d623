//! Utility functions for the convention stages.
//!
//! This module provides batch ingest helpers and logging setup.

pub mod image;

pub use self::image::{caffe_batch_from_images, load_caffe_batch};

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; later calls keep the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
