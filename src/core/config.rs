//! Configuration for the convention conversion stages.
//!
//! The legacy per-channel mean that an upstream pipeline stage may already
//! have subtracted is injected here explicitly, rather than read from ambient
//! model-wide state, so every stage is independently constructible and
//! testable.

use crate::core::constants::{IMAGENET_PIXEL_MEANS, IMAGENET_PIXEL_STDS};
use crate::processors::types::{ChannelStats, ColorOrder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating stage configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A statistic vector contains a NaN or infinite entry.
    #[error("field '{field}' must hold finite values, got {value}")]
    NonFiniteValue {
        /// Name of the offending configuration field.
        field: &'static str,
        /// The offending value.
        value: f32,
    },

    /// A standard deviation entry is zero or negative.
    #[error("standard deviation at index {index} must be greater than 0, got {value}")]
    NonPositiveStd {
        /// Channel index of the offending entry.
        index: usize,
        /// The offending value.
        value: f32,
    },
}

/// Configuration for the Torch input convention stage.
///
/// All statistic overrides are optional; the defaults are the ImageNet
/// statistics used by fb.resnet.torch-style pretrained backbones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorchConventionConfig {
    /// Per-channel mean an upstream stage already subtracted from incoming
    /// batches. `None` disables legacy-mean compensation entirely.
    pub legacy_mean: Option<[f32; 3]>,
    /// Channel order `legacy_mean` is expressed in. Defaults to BGR, the
    /// order legacy Caffe pipelines configure their means in.
    pub legacy_mean_order: ColorOrder,
    /// Override for the target per-channel means, RGB order.
    pub pixel_means: Option<[f32; 3]>,
    /// Override for the target per-channel standard deviations, RGB order.
    pub pixel_stds: Option<[f32; 3]>,
}

impl Default for TorchConventionConfig {
    fn default() -> Self {
        Self {
            legacy_mean: None,
            legacy_mean_order: ColorOrder::BGR,
            pixel_means: None,
            pixel_stds: None,
        }
    }
}

impl TorchConventionConfig {
    /// Target per-channel means in effect, RGB order.
    pub fn effective_means(&self) -> [f32; 3] {
        self.pixel_means.unwrap_or(IMAGENET_PIXEL_MEANS)
    }

    /// Target per-channel standard deviations in effect, RGB order.
    pub fn effective_stds(&self) -> [f32; 3] {
        self.pixel_stds.unwrap_or(IMAGENET_PIXEL_STDS)
    }

    /// Legacy mean tagged with its declared channel order, when compensation
    /// is enabled.
    pub fn legacy_stats(&self) -> Option<ChannelStats> {
        self.legacy_mean
            .map(|values| ChannelStats::new(values, self.legacy_mean_order))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any statistic vector contains a non-finite value
    /// or any standard deviation is not strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("pixel_means", &self.effective_means())?;
        let stds = self.effective_stds();
        check_finite("pixel_stds", &stds)?;
        for (index, &value) in stds.iter().enumerate() {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveStd { index, value });
            }
        }
        if let Some(legacy) = self.legacy_mean {
            check_finite("legacy_mean", &legacy)?;
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, values: &[f32; 3]) -> Result<(), ConfigError> {
    for &value in values {
        if !value.is_finite() {
            return Err(ConfigError::NonFiniteValue { field, value });
        }
    }
    Ok(())
}

/// Type-tagged configuration for any registered stage.
///
/// The tag doubles as the name the stage is registered under, mirroring how
/// host model descriptions address pluggable stages by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageConfig {
    /// Caffe BGR input batches re-encoded for Torch-pretrained backbones.
    TorchInput(TorchConventionConfig),
}

impl StageConfig {
    /// Registry name of the stage this configuration describes.
    pub fn stage_name(&self) -> &'static str {
        match self {
            StageConfig::TorchInput(_) => "torch_input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_imagenet_stats() {
        let config = TorchConventionConfig::default();
        assert_eq!(config.effective_means(), IMAGENET_PIXEL_MEANS);
        assert_eq!(config.effective_stds(), IMAGENET_PIXEL_STDS);
        assert!(config.legacy_mean.is_none());
        assert_eq!(config.legacy_mean_order, ColorOrder::BGR);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn legacy_stats_carry_declared_order() {
        let config = TorchConventionConfig {
            legacy_mean: Some([104.0, 117.0, 123.0]),
            ..Default::default()
        };
        let stats = config.legacy_stats().unwrap();
        assert_eq!(stats.in_order(ColorOrder::BGR), [104.0, 117.0, 123.0]);
        assert_eq!(stats.in_order(ColorOrder::RGB), [123.0, 117.0, 104.0]);
    }

    #[test]
    fn validate_rejects_non_positive_std() {
        let config = TorchConventionConfig {
            pixel_stds: Some([0.0, 1.0, 1.0]),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveStd { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let config = TorchConventionConfig {
            pixel_means: Some([f32::NAN, 0.5, 0.5]),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteValue {
                field: "pixel_means",
                ..
            })
        ));

        let config = TorchConventionConfig {
            legacy_mean: Some([f32::INFINITY, 0.0, 0.0]),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteValue {
                field: "legacy_mean",
                ..
            })
        ));
    }

    #[test]
    fn stage_config_deserializes_from_tagged_json() {
        let config: StageConfig = serde_json::from_str(
            r#"{"type":"torch_input","legacy_mean":[104.0,117.0,123.0]}"#,
        )
        .unwrap();
        assert_eq!(config.stage_name(), "torch_input");
        let StageConfig::TorchInput(inner) = config;
        assert_eq!(inner.legacy_mean, Some([104.0, 117.0, 123.0]));
        assert_eq!(inner.legacy_mean_order, ColorOrder::BGR);
    }

    #[test]
    fn stage_config_serde_roundtrip() {
        let config = StageConfig::TorchInput(TorchConventionConfig {
            legacy_mean: Some([1.0, 2.0, 3.0]),
            legacy_mean_order: ColorOrder::RGB,
            pixel_means: Some([0.5, 0.5, 0.5]),
            pixel_stds: Some([0.25, 0.25, 0.25]),
        });
        let json = serde_json::to_string(&config).unwrap();
        let back: StageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
