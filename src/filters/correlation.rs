//! Rectangular-mask correlation over image buffers.
//!
//! The mask is anchored at the top-left of each pixel's patch: the response
//! at (y, x) sums `mask(i, j) * input(y + i, x + j)` over the mask extent.
//! Patches truncated by the bottom/right image border contribute zero for
//! the missing samples; there is no leading-edge padding. The bias is added
//! to every sum before the activation runs.
//!
//! ## Supported Formats
//!
//! The multi-channel entry accepts images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - filters the single channel
//! - **RGB**: (height, width, 3) - filters all 3 channels independently
//! - **RGBA**: (height, width, 4) - filters RGB, copies alpha through raw
//!
//! Responses are raw `f32` values - signed and unbounded under Identity
//! activation. Use [`crate::filters::postprocess`] to bring a response back
//! into displayable 8-bit range.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use rayon::prelude::*;

use crate::mask::MaskDescriptor;

/// Correlate a single channel with a mask descriptor.
///
/// # Arguments
/// * `channel` - 2D buffer of real-valued samples (height, width)
/// * `mask` - validated mask with bias and activation
///
/// # Returns
/// Same-size raw response buffer, unclamped
pub fn correlate_channel(channel: ArrayView2<f32>, mask: &MaskDescriptor) -> Array2<f32> {
    let (height, width) = channel.dim();
    let (mask_rows, mask_cols) = mask.shape();
    let weights = mask.weights();
    let bias = mask.bias() as f32;
    let activation = mask.activation();

    let mut output = Array2::<f32>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            // Window truncation at the bottom/right border: samples past
            // the edge contribute zero, so only the in-bounds extent sums.
            let span_rows = mask_rows.min(height - y);
            let span_cols = mask_cols.min(width - x);

            let mut sum = bias;
            for i in 0..span_rows {
                for j in 0..span_cols {
                    sum += weights[[i, j]] * channel[[y + i, x + j]];
                }
            }

            output[[y, x]] = activation.apply(sum);
        }
    }

    output
}

/// Correlate every color channel of an 8-bit image with the same mask.
///
/// Channels are independent, so they run in parallel. Alpha, if present,
/// is copied through as raw values and never filtered.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `mask` - validated mask with bias and activation
///
/// # Returns
/// Raw `f32` response with the same shape and channel order
pub fn correlate_u8(input: ArrayView3<u8>, mask: &MaskDescriptor) -> Array3<f32> {
    let (height, width, channels) = input.dim();
    let color_channels = if channels == 4 { 3 } else { channels };

    let planes: Vec<Array2<f32>> = (0..color_channels)
        .map(|c| {
            let mut plane = Array2::<f32>::zeros((height, width));
            for y in 0..height {
                for x in 0..width {
                    plane[[y, x]] = input[[y, x, c]] as f32;
                }
            }
            plane
        })
        .collect();

    let filtered: Vec<Array2<f32>> = planes
        .par_iter()
        .map(|plane| correlate_channel(plane.view(), mask))
        .collect();

    let mut output = Array3::<f32>::zeros((height, width, channels));
    for (c, plane) in filtered.iter().enumerate() {
        for y in 0..height {
            for x in 0..width {
                output[[y, x, c]] = plane[[y, x]];
            }
        }
    }
    if channels == 4 {
        for y in 0..height {
            for x in 0..width {
                output[[y, x, 3]] = input[[y, x, 3]] as f32;
            }
        }
    }

    output
}
