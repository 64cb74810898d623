//! Numeric processors behind the convention stages.
//!
//! Processors hold the constants of a transform and apply it to batches;
//! they know nothing about the host engine's lifecycle.

pub mod normalization;
pub mod types;

pub use normalization::ConventionNormalizer;
pub use types::{ChannelStats, ColorOrder};
