//! Tensor aliases for image batches.
//!
//! Batches are 4-dimensional `f32` arrays with a fixed axis order:
//! (batch, channel, height, width).

use ndarray::Array4;

/// 4D tensor in (batch, channel, height, width) layout.
pub type Tensor4D = Array4<f32>;

/// Copies a 4D `shape()` slice into a fixed-size array.
///
/// Callers must pass a slice of at least four elements; batch tensors in this
/// crate always satisfy that.
pub fn shape4(shape: &[usize]) -> [usize; 4] {
    [shape[0], shape[1], shape[2], shape[3]]
}
