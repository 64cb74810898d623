//! Constants shared across the convention conversion stages.

/// Per-channel pixel means of the ImageNet training set, RGB order.
pub const IMAGENET_PIXEL_MEANS: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel pixel standard deviations of the ImageNet training set, RGB order.
pub const IMAGENET_PIXEL_STDS: [f32; 3] = [0.229, 0.224, 0.225];

/// Scale dividing raw 8-bit pixel values down to the [0, 1] range.
pub const PIXEL_SCALE: f32 = 255.0;

/// Number of color channels every batch must carry on its channel axis.
pub const EXPECTED_CHANNELS: usize = 3;

/// Permutation applied to the channel axis to read BGR data in RGB order.
///
/// Output channel `c` is filled from source channel `BGR_TO_RGB[c]`. The
/// permutation is its own inverse.
pub const BGR_TO_RGB: [usize; 3] = [2, 1, 0];
