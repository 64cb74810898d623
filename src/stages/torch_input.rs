//! Torch input convention stage.
//!
//! Adapts batches prepared for Caffe-style models (BGR channel order, legacy
//! per-channel mean already subtracted, raw 0-255 scale) into the input
//! convention of backbones pretrained with fb.resnet.torch-style
//! preprocessing.

use crate::core::config::TorchConventionConfig;
use crate::core::errors::PixConvError;
use crate::core::tensor::{Tensor4D, shape4};
use crate::core::traits::{GraphStage, StageInfo};
use crate::processors::ConventionNormalizer;
use crate::processors::normalization::check_channel_axis;
use crate::processors::types::ColorOrder;
use ndarray::ArrayView4;
use tracing::debug;

/// Pipeline stage that re-encodes Caffe-convention batches for
/// Torch-pretrained backbones.
///
/// The stage is an identity shape transform: the output shape declared at
/// `setup` always equals the input shape, and `forward` re-declares it per
/// batch.
#[derive(Debug)]
pub struct TorchInputStage {
    normalizer: ConventionNormalizer,
    config: TorchConventionConfig,
    declared_shape: Option<[usize; 4]>,
}

impl TorchInputStage {
    /// Name the stage is registered under.
    pub const NAME: &'static str = "torch_input";

    /// Creates a stage from a validated configuration.
    pub fn new(config: TorchConventionConfig) -> Result<Self, PixConvError> {
        let normalizer = ConventionNormalizer::new(&config)?;
        Ok(Self {
            normalizer,
            config,
            declared_shape: None,
        })
    }

    /// Creates a builder with default configuration.
    pub fn builder() -> TorchInputStageBuilder {
        TorchInputStageBuilder::new()
    }

    /// Output shape declared by the most recent `setup` or `forward` call.
    pub fn declared_shape(&self) -> Option<[usize; 4]> {
        self.declared_shape
    }

    /// The normalizer carrying the fixed transform constants.
    pub fn normalizer(&self) -> &ConventionNormalizer {
        &self.normalizer
    }
}

impl GraphStage for TorchInputStage {
    fn info(&self) -> StageInfo {
        StageInfo::new(
            Self::NAME,
            "1.0.0",
            "Caffe BGR to Torch RGB input convention adapter",
        )
    }

    fn setup(&mut self, input_shape: [usize; 4]) -> Result<[usize; 4], PixConvError> {
        check_channel_axis("stage_setup", &input_shape)?;
        debug!(
            stage = Self::NAME,
            ?input_shape,
            legacy_compensation = self.config.legacy_mean.is_some(),
            "stage setup"
        );
        self.declared_shape = Some(input_shape);
        Ok(input_shape)
    }

    fn forward(&mut self, input: ArrayView4<'_, f32>) -> Result<Tensor4D, PixConvError> {
        let output = self.normalizer.forward(input)?;
        debug!(stage = Self::NAME, shape = ?output.shape(), "forward pass complete");
        self.declared_shape = Some(shape4(output.shape()));
        Ok(output)
    }

    /// Gradients are blocked at this stage.
    fn backward(
        &mut self,
        _grad_output: ArrayView4<'_, f32>,
    ) -> Result<Option<Tensor4D>, PixConvError> {
        Ok(None)
    }

    /// Shape adaptation happens during `forward`.
    fn reshape(&mut self, _input_shape: [usize; 4]) -> Result<(), PixConvError> {
        Ok(())
    }

    fn propagates_gradient(&self) -> bool {
        false
    }
}

/// Builder for [`TorchInputStage`].
#[derive(Debug, Default)]
pub struct TorchInputStageBuilder {
    config: TorchConventionConfig,
}

impl TorchInputStageBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: TorchConventionConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables legacy-mean compensation with a mean expressed in `order`.
    pub fn legacy_mean(mut self, mean: [f32; 3], order: ColorOrder) -> Self {
        self.config.legacy_mean = Some(mean);
        self.config.legacy_mean_order = order;
        self
    }

    /// Overrides the target per-channel statistics (RGB order).
    pub fn pixel_stats(mut self, means: [f32; 3], stds: [f32; 3]) -> Self {
        self.config.pixel_means = Some(means);
        self.config.pixel_stds = Some(stds);
        self
    }

    /// Builds the stage, validating the configuration.
    pub fn build(self) -> Result<TorchInputStage, PixConvError> {
        TorchInputStage::new(self.config)
    }
}
