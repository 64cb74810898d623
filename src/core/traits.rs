//! Traits defining the stage lifecycle contract.
//!
//! Stages are pluggable units inside an externally owned computation graph.
//! The host engine calls the hooks in a fixed order: [`GraphStage::setup`]
//! once, then [`GraphStage::forward`] per batch, with
//! [`GraphStage::reshape`] and [`GraphStage::backward`] as needed.

use crate::core::errors::PixConvError;
use crate::core::tensor::Tensor4D;
use ndarray::ArrayView4;
use std::fmt::Debug;

/// Identifying metadata for a pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageInfo {
    /// Name the stage is addressed by in model descriptions.
    pub name: String,
    /// Stage version.
    pub version: String,
    /// Human-readable description of what the stage does.
    pub description: String,
}

impl StageInfo {
    /// Creates new stage metadata.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

/// A pluggable stage in an externally scheduled forward pass.
///
/// Implementations must be safe to share across pipelined batches: any state
/// fixed at construction is read-only during `forward`, and `forward` itself
/// has no side effects beyond producing the output buffer.
pub trait GraphStage: Debug + Send + Sync {
    /// Identifying metadata for this stage.
    fn info(&self) -> StageInfo;

    /// Called once before any `forward`.
    ///
    /// Receives the shape of the input buffer slot and returns the declared
    /// output shape.
    fn setup(&mut self, input_shape: [usize; 4]) -> Result<[usize; 4], PixConvError>;

    /// Called once per batch; reads the input buffer and produces the output
    /// buffer.
    fn forward(&mut self, input: ArrayView4<'_, f32>) -> Result<Tensor4D, PixConvError>;

    /// Called when the engine requests gradient propagation through this
    /// stage.
    ///
    /// Stages that do not propagate gradients return `Ok(None)`; the input
    /// buffer is never touched.
    fn backward(
        &mut self,
        grad_output: ArrayView4<'_, f32>,
    ) -> Result<Option<Tensor4D>, PixConvError> {
        let _ = grad_output;
        Ok(None)
    }

    /// Called when the engine re-negotiates buffer shapes outside `forward`.
    fn reshape(&mut self, input_shape: [usize; 4]) -> Result<(), PixConvError> {
        let _ = input_shape;
        Ok(())
    }

    /// Whether the engine should schedule `backward` for this stage at all.
    fn propagates_gradient(&self) -> bool {
        true
    }
}
