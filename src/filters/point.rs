//! Fixed point (per-pixel) intensity transforms.

use ndarray::{Array3, ArrayView3};

/// LUT for the midtone tent map: 0 -> 0, 128 -> 255, 255 -> 0.
///
/// Intensities up to 128 ramp linearly to white; above 128 they descend
/// along the line through (128, 255) and (255, 0).
fn tent_lut() -> [u8; 256] {
    let slope = (0.0 - 255.0) / (255.0 - 128.0);
    let intercept = 255.0 - slope * 128.0;

    let mut lut = [0u8; 256];
    for (v, entry) in lut.iter_mut().enumerate() {
        let v = v as f32;
        let mapped = if v <= 128.0 {
            v * 255.0 / 128.0
        } else {
            slope * v + intercept
        };
        *entry = mapped.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply the midtone tent transform to every color channel.
///
/// Midtones brighten toward white while both extremes fall to black;
/// alpha, if present, is preserved.
pub fn tent_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let lut = tent_lut();
    let color_channels = if channels == 4 { 3 } else { channels };

    for y in 0..height {
        for x in 0..width {
            for c in 0..color_channels {
                output[[y, x, c]] = lut[input[[y, x, c]] as usize];
            }
            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_tent_lut_endpoints_and_peak() {
        let lut = tent_lut();

        assert_eq!(lut[0], 0);
        assert_eq!(lut[128], 255);
        assert_eq!(lut[255], 0);
        // Halfway up the rising edge: 64 * 255 / 128 = 127.5 -> 128.
        assert_eq!(lut[64], 128);
    }

    #[test]
    fn test_tent_applies_per_channel_and_keeps_alpha() {
        let mut img = Array3::<u8>::zeros((1, 1, 4));
        img[[0, 0, 0]] = 128;
        img[[0, 0, 1]] = 255;
        img[[0, 0, 2]] = 0;
        img[[0, 0, 3]] = 77;

        let out = tent_u8(img.view());

        assert_eq!(out[[0, 0, 0]], 255);
        assert_eq!(out[[0, 0, 1]], 0);
        assert_eq!(out[[0, 0, 2]], 0);
        assert_eq!(out[[0, 0, 3]], 77);
    }
}
