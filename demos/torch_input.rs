//! Runs the Torch input convention stage over a synthetic batch.
//!
//! The batch mimics what a legacy Caffe pipeline would hand over: BGR
//! channel order with the classic ImageNet BGR mean already subtracted.

use ndarray::Array4;
use pixconv::core::{GraphStage, PixConvError, StageConfig, TorchConventionConfig};
use pixconv::stages::default_registry;
use pixconv::utils::init_tracing;
use tracing::info;

fn main() -> Result<(), PixConvError> {
    init_tracing();

    let config = StageConfig::TorchInput(TorchConventionConfig {
        legacy_mean: Some([104.0, 117.0, 123.0]),
        ..TorchConventionConfig::default()
    });
    let mut stage = default_registry().build(&config)?;
    info!(stage = %stage.info().name, "stage built");

    let batch = Array4::from_shape_fn((2, 3, 32, 32), |(n, c, y, x)| {
        ((n + c + y + x) % 256) as f32 - 110.0
    });

    let declared = stage.setup([2, 3, 32, 32])?;
    info!(?declared, "stage ready");

    let output = stage.forward(batch.view())?;
    let mean = output.mean().unwrap_or(0.0);
    info!(shape = ?output.shape(), mean, "converted batch");

    Ok(())
}
