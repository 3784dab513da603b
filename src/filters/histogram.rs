//! Global histogram equalization.
//!
//! Spreads the intensity distribution of an 8-bit channel across the full
//! range through a cumulative-histogram lookup table:
//!
//! ```text
//! lut[v] = round((cdf[v] - cdf_min) * 255 / (total - cdf_min))
//! ```
//!
//! where `cdf_min` is the smallest nonzero cumulative count. Entries are
//! clamped to [0, 255].
//!
//! ## Supported Formats
//!
//! The multi-channel entry accepts images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - equalizes the single channel
//! - **RGB**: (height, width, 3) - equalizes all 3 channels independently
//! - **RGBA**: (height, width, 4) - equalizes RGB, preserves alpha

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

const BINS: usize = 256;

/// Count intensity occurrences in a single channel.
fn histogram(channel: ArrayView2<u8>) -> [u64; BINS] {
    let mut hist = [0u64; BINS];
    for &v in channel.iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// Equalize a single 8-bit channel.
///
/// Degenerate inputs have defined outputs rather than errors: an empty
/// channel equalizes to an (empty) all-zero buffer, and a channel holding
/// a single distinct intensity passes through unchanged - the remap would
/// divide by zero and there is no distribution to spread.
pub fn equalize_channel(channel: ArrayView2<u8>) -> Array2<u8> {
    let hist = histogram(channel);
    let total: u64 = hist.iter().sum();

    let mut cdf = [0u64; BINS];
    let mut acc = 0u64;
    for (bin, &count) in hist.iter().enumerate() {
        acc += count;
        cdf[bin] = acc;
    }

    // Cannot occur for nonempty input, but guard anyway.
    let Some(cdf_min) = cdf.iter().copied().find(|&c| c > 0) else {
        return Array2::zeros(channel.raw_dim());
    };

    if total == cdf_min {
        return channel.to_owned();
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut lut = [0u8; BINS];
    for (bin, entry) in lut.iter_mut().enumerate() {
        // cdf[bin] < cdf_min only below the first occupied bin; those
        // entries pin to 0.
        let shifted = cdf[bin].saturating_sub(cdf_min) as f64;
        *entry = (shifted * scale).round().clamp(0.0, 255.0) as u8;
    }

    channel.mapv(|v| lut[v as usize])
}

/// Equalize every color channel of an image independently.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
///
/// # Returns
/// Equalized image with same channel count, alpha preserved
pub fn equalize_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    for c in 0..color_channels {
        let equalized = equalize_channel(input.index_axis(Axis(2), c));
        for y in 0..height {
            for x in 0..width {
                output[[y, x, c]] = equalized[[y, x]];
            }
        }
    }
    if channels == 4 {
        for y in 0..height {
            for x in 0..width {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_lut_formula_on_four_distinct_values() {
        // Values 0, 1, 2, 3 with one sample each: cdf = [1, 2, 3, 4],
        // cdf_min = 1, total = 4, so lut[v] = round((cdf - 1) * 255 / 3).
        let channel = array![[0u8, 1], [2, 3]];

        let out = equalize_channel(channel.view());

        assert_eq!(out, array![[0u8, 85], [170, 255]]);
    }

    #[test]
    fn test_equalization_is_stable_on_its_own_output() {
        // Re-equalizing an already-equalized channel with evenly spread
        // counts maps every occupied level onto itself.
        let channel = array![[0u8, 85], [170, 255]];

        let once = equalize_channel(channel.view());
        let twice = equalize_channel(once.view());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_constant_channel_passes_through() {
        let channel = Array2::<u8>::from_elem((4, 4), 100);

        let out = equalize_channel(channel.view());

        assert_eq!(out, channel);
    }

    #[test]
    fn test_two_value_channel_spreads_to_extremes() {
        // Half the samples at 100, half at 101: cdf_min = total/2, so the
        // lower level maps to 0 and the upper to 255.
        let channel = array![[100u8, 101], [100, 101]];

        let out = equalize_channel(channel.view());

        assert_eq!(out, array![[0u8, 255], [0, 255]]);
    }

    #[test]
    fn test_empty_channel_yields_empty_buffer() {
        let channel = Array2::<u8>::zeros((0, 0));

        let out = equalize_channel(channel.view());

        assert_eq!(out.dim(), (0, 0));
    }

    #[test]
    fn test_channels_equalized_independently() {
        let mut img = Array3::<u8>::zeros((2, 2, 3));
        // Channel 0 has two levels, channels 1 and 2 are constant.
        img[[0, 0, 0]] = 10;
        img[[0, 1, 0]] = 20;
        img[[1, 0, 0]] = 10;
        img[[1, 1, 0]] = 20;
        for y in 0..2 {
            for x in 0..2 {
                img[[y, x, 1]] = 50;
                img[[y, x, 2]] = 200;
            }
        }

        let out = equalize_u8(img.view());

        assert_eq!(out[[0, 0, 0]], 0);
        assert_eq!(out[[0, 1, 0]], 255);
        assert_eq!(out[[0, 0, 1]], 50);
        assert_eq!(out[[0, 0, 2]], 200);
    }

    #[test]
    fn test_alpha_preserved() {
        let mut img = Array3::<u8>::zeros((2, 2, 4));
        img[[0, 0, 0]] = 30;
        img[[1, 1, 0]] = 220;
        for y in 0..2 {
            for x in 0..2 {
                img[[y, x, 3]] = 42;
            }
        }

        let out = equalize_u8(img.view());

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out[[y, x, 3]], 42);
            }
        }
    }
}
