//! Caffe-convention batch ingest helpers.
//!
//! The host engine normally owns the input buffers; these helpers exist for
//! demos and tests that need an `(N, 3, H, W)` batch in the source
//! convention (BGR channel order, raw 0-255 scale) built from ordinary RGB
//! images.

use crate::core::constants::EXPECTED_CHANNELS;
use crate::core::errors::PixConvError;
use crate::core::tensor::Tensor4D;
use image::RgbImage;
use rayon::prelude::*;
use std::path::Path;

/// Packs RGB images into a Caffe-convention batch.
///
/// All images must share the same dimensions; an empty slice yields an empty
/// batch.
///
/// # Errors
///
/// Returns an error if the images do not all have the same dimensions.
pub fn caffe_batch_from_images(images: &[RgbImage]) -> Result<Tensor4D, PixConvError> {
    let Some(first) = images.first() else {
        return Ok(Tensor4D::zeros((0, EXPECTED_CHANNELS, 0, 0)));
    };
    let (width, height) = first.dimensions();
    for (index, img) in images.iter().enumerate() {
        if img.dimensions() != (width, height) {
            return Err(PixConvError::invalid_input(format!(
                "all images in a batch must share dimensions: image 0 is {width}x{height}, image {index} is {}x{}",
                img.width(),
                img.height()
            )));
        }
    }

    let (height, width) = (height as usize, width as usize);
    let img_size = EXPECTED_CHANNELS * height * width;
    let mut data = vec![0.0f32; images.len() * img_size];

    if images.len() == 1 {
        // Avoid rayon overhead for single-image batches
        pack_image(first, &mut data[..img_size], height, width);
    } else {
        data.par_chunks_mut(img_size)
            .zip(images.par_iter())
            .for_each(|(chunk, img)| pack_image(img, chunk, height, width));
    }

    Ok(Tensor4D::from_shape_vec(
        (images.len(), EXPECTED_CHANNELS, height, width),
        data,
    )?)
}

/// Loads images from disk and packs them into a Caffe-convention batch.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or the images do not all have
/// the same dimensions.
pub fn load_caffe_batch<P: AsRef<Path>>(paths: &[P]) -> Result<Tensor4D, PixConvError> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(image::open(path)?.to_rgb8());
    }
    caffe_batch_from_images(&images)
}

fn pack_image(img: &RgbImage, chunk: &mut [f32], height: usize, width: usize) {
    for y in 0..height {
        for x in 0..width {
            let pixel = img.get_pixel(x as u32, y as u32);
            for channel in 0..EXPECTED_CHANNELS {
                // Plane order is BGR: plane 0 reads pixel[2] (blue)
                chunk[channel * height * width + y * width + x] = pixel[2 - channel] as f32;
            }
        }
    }
}
