//! Conversions from raw correlation responses back to displayable 8-bit.
//!
//! Directional-derivative masks (Sobel and friends) produce signed,
//! unbounded responses; [`rescale_response_u8`] folds and stretches those
//! into [0, 255]. Responses that are already display-bounded (smoothing
//! masks, ReLU outputs in range) should use [`clamp_response_u8`] instead -
//! rescaling a bounded result would distort its levels.

use ndarray::{Array3, ArrayView3};

/// Rescale a signed edge response into the displayable range.
///
/// Per channel independently: take the absolute value, then map the
/// channel minimum to 0 and maximum to 255. A constant channel comes out
/// entirely 0. Alpha, if present, is clamped through unchanged.
///
/// # Arguments
/// * `response` - Raw response with 1, 3, or 4 channels (height, width, channels)
///
/// # Returns
/// 8-bit image with the same shape and channel order
pub fn rescale_response_u8(response: ArrayView3<f32>) -> Array3<u8> {
    let (height, width, channels) = response.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    for c in 0..color_channels {
        let mut min_val = f32::INFINITY;
        let mut max_val = f32::NEG_INFINITY;
        for y in 0..height {
            for x in 0..width {
                let v = response[[y, x, c]].abs();
                min_val = min_val.min(v);
                max_val = max_val.max(v);
            }
        }

        // Constant channel: nothing to stretch, leave it at 0.
        if max_val <= min_val {
            continue;
        }

        let range = max_val - min_val;
        for y in 0..height {
            for x in 0..width {
                let v = response[[y, x, c]].abs();
                let stretched = (v - min_val) / range * 255.0;
                output[[y, x, c]] = stretched.clamp(0.0, 255.0) as u8;
            }
        }
    }

    if channels == 4 {
        for y in 0..height {
            for x in 0..width {
                output[[y, x, 3]] = response[[y, x, 3]].clamp(0.0, 255.0) as u8;
            }
        }
    }

    output
}

/// Clamp an already display-bounded response to [0, 255] and cast to 8-bit.
pub fn clamp_response_u8(response: ArrayView3<f32>) -> Array3<u8> {
    response.mapv(|v| v.clamp(0.0, 255.0) as u8)
}
