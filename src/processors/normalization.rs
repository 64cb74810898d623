//! Pixel convention normalization.
//!
//! This module converts image batches between the input conventions of two
//! pretrained model families: the Caffe convention (BGR channel order,
//! optional legacy per-channel mean already subtracted, raw 0-255 scale) and
//! the Torch convention (RGB order, [0, 1] scale, standardized with fixed
//! per-channel statistics).

use crate::core::config::TorchConventionConfig;
use crate::core::constants::{
    BGR_TO_RGB, EXPECTED_CHANNELS, IMAGENET_PIXEL_MEANS, IMAGENET_PIXEL_STDS, PIXEL_SCALE,
};
use crate::core::errors::PixConvError;
use crate::core::tensor::Tensor4D;
use crate::processors::types::ColorOrder;
use ndarray::parallel::prelude::*;
use ndarray::{ArrayView3, ArrayView4, ArrayViewMut3, Axis};

/// Fails fast when a batch does not carry exactly three channels.
pub(crate) fn check_channel_axis(operation: &str, shape: &[usize]) -> Result<(), PixConvError> {
    if shape[1] != EXPECTED_CHANNELS {
        return Err(PixConvError::shape_mismatch(
            operation,
            &[shape[0], EXPECTED_CHANNELS, shape[2], shape[3]],
            shape,
            "channel axis must hold exactly 3 entries",
        ));
    }
    Ok(())
}

/// Converts image batches from the Caffe convention to the Torch convention.
///
/// The per-channel work is folded into a single affine transform applied to
/// the permuted channel planes. The constants are fixed at construction and
/// never change afterwards; `forward` is pure and safe to call concurrently.
#[derive(Debug, Clone)]
pub struct ConventionNormalizer {
    /// Per-channel multipliers (alpha = 1 / (255 * std)), output RGB order.
    pub alpha: [f32; 3],
    /// Per-channel offsets (beta = (legacy_mean / 255 - mean) / std), output
    /// RGB order.
    pub beta: [f32; 3],
}

impl ConventionNormalizer {
    /// Creates a normalizer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds non-finite statistics or
    /// a non-positive standard deviation.
    pub fn new(config: &TorchConventionConfig) -> Result<Self, PixConvError> {
        config.validate()?;
        let legacy_rgb = config
            .legacy_stats()
            .map(|stats| stats.in_order(ColorOrder::RGB))
            .unwrap_or([0.0; 3]);
        Ok(Self::from_stats(
            config.effective_means(),
            config.effective_stds(),
            legacy_rgb,
        ))
    }

    /// Normalizer with the ImageNet statistics and no legacy compensation.
    pub fn imagenet() -> Self {
        Self::from_stats(IMAGENET_PIXEL_MEANS, IMAGENET_PIXEL_STDS, [0.0; 3])
    }

    fn from_stats(means: [f32; 3], stds: [f32; 3], legacy_rgb: [f32; 3]) -> Self {
        let mut alpha = [0.0f32; EXPECTED_CHANNELS];
        let mut beta = [0.0f32; EXPECTED_CHANNELS];
        for channel in 0..EXPECTED_CHANNELS {
            alpha[channel] = 1.0 / (PIXEL_SCALE * stds[channel]);
            beta[channel] = (legacy_rgb[channel] / PIXEL_SCALE - means[channel]) / stds[channel];
        }
        Self { alpha, beta }
    }

    /// Re-encodes a Caffe-convention batch in the Torch convention.
    ///
    /// The output shape equals the input shape. Per-image work is distributed
    /// over rayon for multi-image batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel axis does not hold exactly 3 entries.
    pub fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Tensor4D, PixConvError> {
        check_channel_axis("convention_forward", input.shape())?;
        Ok(self.map_batch(input, |src, dst| self.convert_image(src, dst)))
    }

    /// Recovers the Caffe-convention batch a `forward` output came from.
    ///
    /// Exact algebraic inverse of [`ConventionNormalizer::forward`]; values
    /// round-trip within floating-point tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel axis does not hold exactly 3 entries.
    pub fn invert(&self, output: ArrayView4<'_, f32>) -> Result<Tensor4D, PixConvError> {
        check_channel_axis("convention_invert", output.shape())?;
        Ok(self.map_batch(output, |src, dst| self.restore_image(src, dst)))
    }

    fn map_batch<F>(&self, input: ArrayView4<'_, f32>, per_image: F) -> Tensor4D
    where
        F: Fn(ArrayView3<'_, f32>, ArrayViewMut3<'_, f32>) + Send + Sync,
    {
        let mut output = Tensor4D::zeros(input.raw_dim());
        if input.len_of(Axis(0)) == 1 {
            // Avoid rayon overhead for single-image batches
            per_image(
                input.index_axis(Axis(0), 0),
                output.index_axis_mut(Axis(0), 0),
            );
        } else {
            input
                .axis_iter(Axis(0))
                .into_par_iter()
                .zip(output.axis_iter_mut(Axis(0)).into_par_iter())
                .for_each(|(src, dst)| per_image(src, dst));
        }
        output
    }

    fn convert_image(&self, src: ArrayView3<'_, f32>, mut dst: ArrayViewMut3<'_, f32>) {
        for (channel, &src_channel) in BGR_TO_RGB.iter().enumerate() {
            let alpha = self.alpha[channel];
            let beta = self.beta[channel];
            let src_plane = src.index_axis(Axis(0), src_channel);
            let mut dst_plane = dst.index_axis_mut(Axis(0), channel);
            dst_plane.zip_mut_with(&src_plane, |out, &value| *out = value * alpha + beta);
        }
    }

    fn restore_image(&self, src: ArrayView3<'_, f32>, mut dst: ArrayViewMut3<'_, f32>) {
        for (channel, &src_channel) in BGR_TO_RGB.iter().enumerate() {
            let alpha = self.alpha[channel];
            let beta = self.beta[channel];
            // forward filled output channel `channel` from source channel
            // `src_channel`; undo exactly that mapping
            let normalized_plane = src.index_axis(Axis(0), channel);
            let mut dst_plane = dst.index_axis_mut(Axis(0), src_channel);
            dst_plane.zip_mut_with(&normalized_plane, |out, &value| *out = (value - beta) / alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array4, s};

    fn single_pixel(b: f32, g: f32, r: f32) -> Array4<f32> {
        Array4::from_shape_vec((1, 3, 1, 1), vec![b, g, r]).unwrap()
    }

    #[test]
    fn converts_bgr_pixel_to_standardized_rgb() {
        let normalizer = ConventionNormalizer::imagenet();
        let output = normalizer
            .forward(single_pixel(10.0, 20.0, 30.0).view())
            .unwrap();

        let expected = [
            (30.0 / 255.0 - 0.485) / 0.229,
            (20.0 / 255.0 - 0.456) / 0.224,
            (10.0 / 255.0 - 0.406) / 0.225,
        ];
        for (channel, &want) in expected.iter().enumerate() {
            assert!(
                (output[[0, channel, 0, 0]] - want).abs() < 1e-5,
                "channel {channel}: got {}, want {want}",
                output[[0, channel, 0, 0]]
            );
        }
    }

    #[test]
    fn preserves_batch_shape() {
        let normalizer = ConventionNormalizer::imagenet();
        let batch = Array4::<f32>::zeros((4, 3, 6, 5));
        let output = normalizer.forward(batch.view()).unwrap();
        assert_eq!(output.shape(), batch.shape());
    }

    #[test]
    fn legacy_compensation_matches_manual_add() {
        let legacy = [5.0f32, 10.0, 15.0]; // BGR
        let config = TorchConventionConfig {
            legacy_mean: Some(legacy),
            ..Default::default()
        };
        let compensating = ConventionNormalizer::new(&config).unwrap();
        let plain = ConventionNormalizer::imagenet();

        let input = Array4::from_shape_fn((2, 3, 2, 2), |(n, c, y, x)| {
            (n * 47 + c * 31 + y * 7 + x) as f32 - 60.0
        });
        let mut shifted = input.clone();
        for (channel, &mean) in legacy.iter().enumerate() {
            shifted
                .index_axis_mut(Axis(1), channel)
                .mapv_inplace(|v| v + mean);
        }

        let with_config = compensating.forward(input.view()).unwrap();
        let with_manual_add = plain.forward(shifted.view()).unwrap();
        for (a, b) in with_config.iter().zip(with_manual_add.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn invert_recovers_original_input() {
        let config = TorchConventionConfig {
            legacy_mean: Some([104.0, 117.0, 123.0]),
            ..Default::default()
        };
        let normalizer = ConventionNormalizer::new(&config).unwrap();
        let input = Array4::from_shape_fn((2, 3, 4, 5), |(n, c, y, x)| {
            ((n + 3 * c + 5 * y + 7 * x) % 256) as f32 - 117.0
        });

        let output = normalizer.forward(input.view()).unwrap();
        let restored = normalizer.invert(output.view()).unwrap();
        for (original, back) in input.iter().zip(restored.iter()) {
            assert!((original - back).abs() < 1e-3);
        }
    }

    #[test]
    fn transform_is_not_idempotent() {
        let normalizer = ConventionNormalizer::imagenet();
        let input = single_pixel(10.0, 20.0, 30.0);
        let once = normalizer.forward(input.view()).unwrap();
        let twice = normalizer.forward(once.view()).unwrap();
        assert!((once[[0, 0, 0, 0]] - twice[[0, 0, 0, 0]]).abs() > 1e-3);
    }

    #[test]
    fn batched_output_matches_per_image_output() {
        let normalizer = ConventionNormalizer::imagenet();
        let batch = Array4::from_shape_fn((3, 3, 4, 4), |(n, c, y, x)| {
            (n * 59 + c * 17 + y * 5 + x * 3) as f32
        });

        let full = normalizer.forward(batch.view()).unwrap();
        for n in 0..3 {
            let single = normalizer
                .forward(batch.slice(s![n..n + 1, .., .., ..]))
                .unwrap();
            for (a, b) in full.index_axis(Axis(0), n).iter().zip(single.iter()) {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn constants_do_not_change_between_calls() {
        let normalizer = ConventionNormalizer::imagenet();
        let (alpha, beta) = (normalizer.alpha, normalizer.beta);

        let first = normalizer
            .forward(single_pixel(1.0, 2.0, 3.0).view())
            .unwrap();
        let _other = normalizer
            .forward(single_pixel(200.0, 100.0, 50.0).view())
            .unwrap();
        let again = normalizer
            .forward(single_pixel(1.0, 2.0, 3.0).view())
            .unwrap();

        assert_eq!(normalizer.alpha, alpha);
        assert_eq!(normalizer.beta, beta);
        assert_eq!(first, again);
    }

    #[test]
    fn rejects_non_three_channel_batches() {
        let normalizer = ConventionNormalizer::imagenet();
        let batch = Array4::<f32>::zeros((1, 4, 2, 2));
        let err = normalizer.forward(batch.view()).unwrap_err();
        assert!(matches!(err, PixConvError::TensorOperation { .. }));

        let err = normalizer.invert(batch.view()).unwrap_err();
        assert!(matches!(err, PixConvError::TensorOperation { .. }));
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = TorchConventionConfig {
            pixel_stds: Some([0.0, 1.0, 1.0]),
            ..Default::default()
        };
        assert!(matches!(
            ConventionNormalizer::new(&config),
            Err(PixConvError::Config { .. })
        ));
    }
}
