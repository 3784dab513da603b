//! File-level orchestration.
//!
//! A run is described by an explicit [`PipelineConfig`] - input path,
//! output path, operation - rather than any process-wide state. The
//! combined equalize-and-expand pipeline also lives here, since it is the
//! one place that sequences two filters per channel.

use std::path::PathBuf;

use ndarray::{Array3, ArrayView3, Axis};

use crate::error::Result;
use crate::filters::{correlation, histogram, local_contrast, point, postprocess};
use crate::io;
use crate::mask::MaskDescriptor;

/// Operation to run over the input image.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Correlate with the mask described by `mask_path`. With `rescale`
    /// set, the raw response is folded and stretched per channel (for
    /// signed edge masks); otherwise it is clamped to [0, 255].
    Correlate { mask_path: PathBuf, rescale: bool },
    /// Global histogram equalization followed by local contrast expansion
    /// with the given structuring window.
    Enhance {
        window_rows: usize,
        window_cols: usize,
    },
    /// Midtone tent point transform.
    Tent,
}

/// Explicit run configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub image_path: PathBuf,
    pub output_path: PathBuf,
    pub operation: Operation,
}

/// Equalize globally, then expand contrast locally, per channel.
///
/// Grayscale images process their single channel; color images process
/// R, G and B independently and recombine in the original channel order,
/// with alpha re-attached last. Channel counts other than 1, 3 or 4 are
/// rejected before any pixel work, as is an empty structuring window.
pub fn equalize_and_expand(
    input: ArrayView3<u8>,
    window_rows: usize,
    window_cols: usize,
) -> Result<Array3<u8>> {
    local_contrast::validate_window(window_rows, window_cols)?;
    let (height, width, channels) = input.dim();
    io::channels_supported(channels)?;

    let color_channels = if channels == 4 { 3 } else { channels };
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for c in 0..color_channels {
        let equalized = histogram::equalize_channel(input.index_axis(Axis(2), c));
        let expanded =
            local_contrast::expand_channel(equalized.view(), window_rows, window_cols)?;
        for y in 0..height {
            for x in 0..width {
                output[[y, x, c]] = expanded[[y, x]];
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

    Ok(output)
}

/// Execute a configured run: load, filter, save.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let input = io::load_u8(&config.image_path)?;
    let (height, width, channels) = input.dim();
    tracing::info!(
        "loaded {}: {}x{}, {} channel(s)",
        config.image_path.display(),
        width,
        height,
        channels
    );

    let result = match &config.operation {
        Operation::Correlate { mask_path, rescale } => {
            let mask = MaskDescriptor::load(mask_path)?;
            tracing::info!(
                "mask {}x{}, bias {}, activation {}",
                mask.rows(),
                mask.cols(),
                mask.bias(),
                mask.activation()
            );
            let response = correlation::correlate_u8(input.view(), &mask);
            if *rescale {
                postprocess::rescale_response_u8(response.view())
            } else {
                postprocess::clamp_response_u8(response.view())
            }
        }
        Operation::Enhance {
            window_rows,
            window_cols,
        } => equalize_and_expand(input.view(), *window_rows, *window_cols)?,
        Operation::Tent => point::tent_u8(input.view()),
    };

    io::save_u8(result.view(), &config.output_path)?;
    tracing::info!("wrote {}", config.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::Array3;

    #[test]
    fn test_unsupported_channel_count_is_rejected() {
        let img = Array3::<u8>::zeros((2, 2, 2));

        assert!(matches!(
            equalize_and_expand(img.view(), 3, 3).unwrap_err(),
            Error::UnsupportedShape(2)
        ));
    }

    #[test]
    fn test_zero_window_is_rejected_before_shape_check() {
        let img = Array3::<u8>::zeros((2, 2, 3));

        assert!(matches!(
            equalize_and_expand(img.view(), 0, 0).unwrap_err(),
            Error::InvalidWindow { .. }
        ));
    }

    #[test]
    fn test_constant_image_survives_both_stages() {
        // A single distinct intensity: equalization passes it through and
        // every local window is flat, so expansion does too.
        let img = Array3::<u8>::from_elem((4, 4, 3), 100);

        let out = equalize_and_expand(img.view(), 3, 3).unwrap();

        assert_eq!(out, img);
    }

    #[test]
    fn test_grayscale_two_level_image() {
        // Two levels equalize to 0 and 255; expansion then leaves each
        // pixel at its window extreme.
        let mut img = Array3::<u8>::zeros((1, 4, 1));
        img[[0, 0, 0]] = 100;
        img[[0, 1, 0]] = 100;
        img[[0, 2, 0]] = 101;
        img[[0, 3, 0]] = 101;

        let out = equalize_and_expand(img.view(), 1, 1).unwrap();

        // 1x1 window: expansion is the identity, output is the equalized image.
        assert_eq!(out[[0, 0, 0]], 0);
        assert_eq!(out[[0, 3, 0]], 255);
    }

    #[test]
    fn test_alpha_reattached_last() {
        let mut img = Array3::<u8>::zeros((2, 2, 4));
        img[[0, 0, 0]] = 10;
        img[[1, 1, 0]] = 240;
        for y in 0..2 {
            for x in 0..2 {
                img[[y, x, 3]] = 160;
            }
        }

        let out = equalize_and_expand(img.view(), 3, 3).unwrap();

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out[[y, x, 3]], 160);
            }
        }
    }
}
