//! Pixel convention conversion stages for neural inference pipelines.
//!
//! `pixconv` adapts image batches between the input conventions of different
//! pretrained model families. Its core stage re-encodes batches prepared for
//! Caffe-style models (BGR channel order, optional legacy per-channel mean
//! already subtracted, raw 0-255 scale) into the convention expected by
//! backbones pretrained with fb.resnet.torch-style preprocessing (RGB order,
//! [0, 1] scale, standardized with fixed ImageNet statistics).
//!
//! Stages implement the [`GraphStage`] lifecycle contract
//! (`setup`/`forward`/`backward`/`reshape`) so an external engine can
//! schedule them inside its computation graph. The numeric transforms live
//! in [`processors`] and can be used on their own.
//!
//! # Example
//!
//! ```
//! use ndarray::Array4;
//! use pixconv::core::{GraphStage, TorchConventionConfig};
//! use pixconv::stages::TorchInputStage;
//!
//! # fn main() -> Result<(), pixconv::core::PixConvError> {
//! let mut stage = TorchInputStage::new(TorchConventionConfig::default())?;
//! let declared = stage.setup([1, 3, 8, 8])?;
//!
//! let batch = Array4::<f32>::zeros((1, 3, 8, 8));
//! let output = stage.forward(batch.view())?;
//! assert_eq!(output.shape(), &declared);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod processors;
pub mod stages;
pub mod utils;

pub use crate::core::{
    GraphStage, PixConvError, StageConfig, StageInfo, Tensor4D, TorchConventionConfig,
};
pub use crate::processors::{ChannelStats, ColorOrder, ConventionNormalizer};
pub use crate::stages::{StageRegistry, TorchInputStage, default_registry};
