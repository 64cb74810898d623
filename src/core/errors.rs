//! Core error types for the convention conversion stages.
//!
//! All failures are fail-fast: a misconfigured stage errors at construction,
//! and a malformed batch errors at `setup` or `forward` time. Nothing is
//! retried or recovered locally.

use thiserror::Error;

/// Errors that can occur while building or running a convention stage.
#[derive(Error, Debug)]
pub enum PixConvError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from tensor operations with detailed shape context.
    #[error(
        "tensor operation '{operation}' failed: expected shape {expected_shape:?}, got {actual_shape:?} ({context})"
    )]
    TensorOperation {
        /// The tensor operation that failed.
        operation: String,
        /// The expected tensor shape.
        expected_shape: Vec<usize>,
        /// The actual tensor shape.
        actual_shape: Vec<usize>,
        /// Additional context about where the error occurred.
        context: String,
    },

    /// Error from basic tensor operations (fallback for ndarray errors).
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),
}

impl From<crate::core::config::ConfigError> for PixConvError {
    /// Converts a ConfigError to PixConvError::Config.
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

impl PixConvError {
    /// Creates an invalid-input error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a detailed shape-mismatch error for a tensor operation.
    pub fn shape_mismatch(
        operation: impl Into<String>,
        expected_shape: &[usize],
        actual_shape: &[usize],
        context: impl Into<String>,
    ) -> Self {
        Self::TensorOperation {
            operation: operation.into(),
            expected_shape: expected_shape.to_vec(),
            actual_shape: actual_shape.to_vec(),
            context: context.into(),
        }
    }
}
