//! Core building blocks of the convention conversion stages.
//!
//! This module contains:
//! - Fixed channel statistics and scale constants
//! - Configuration management
//! - Error handling
//! - Tensor aliases
//! - The stage lifecycle contract
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tensor;
pub mod traits;

pub use config::{ConfigError, StageConfig, TorchConventionConfig};
pub use constants::*;
pub use errors::PixConvError;
pub use tensor::{Tensor4D, shape4};
pub use traits::{GraphStage, StageInfo};
