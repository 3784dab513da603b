//! Raster file decode/encode at the crate boundary.
//!
//! Files are exchanged with the filters as (height, width, channels)
//! arrays: grayscale sources decode to 1 channel, opaque color to 3, and
//! anything carrying alpha to 4. Encoding dispatches on the channel count
//! of the array being written.

use std::path::Path;

use image::{GrayImage, RgbImage, RgbaImage};
use ndarray::{Array3, ArrayView3};

use crate::error::{Error, Result};

/// Decode a raster file into an 8-bit (height, width, channels) array.
///
/// An unreadable or undecodable file is a fatal resource error; no
/// recovery is attempted.
pub fn load_u8(path: impl AsRef<Path>) -> Result<Array3<u8>> {
    let img = image::open(path.as_ref())?;
    let color = img.color();

    let array = if color.has_alpha() {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        from_raw(rgba.into_raw(), height, width, 4)
    } else if color.channel_count() == 1 {
        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();
        from_raw(gray.into_raw(), height, width, 1)
    } else {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        from_raw(rgb.into_raw(), height, width, 3)
    };

    Ok(array)
}

fn from_raw(data: Vec<u8>, height: u32, width: u32, channels: usize) -> Array3<u8> {
    // Decoded buffers are row-major (height, width, channels), the same
    // layout ndarray uses, so the length always matches.
    Array3::from_shape_vec((height as usize, width as usize, channels), data)
        .expect("decoded buffer length matches its dimensions")
}

/// Encode an 8-bit array to `path`, dispatching on channel count.
pub fn save_u8(image: ArrayView3<u8>, path: impl AsRef<Path>) -> Result<()> {
    let (height, width, channels) = image.dim();

    let mut data = Vec::with_capacity(height * width * channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                data.push(image[[y, x, c]]);
            }
        }
    }

    let (width, height) = (width as u32, height as u32);
    match channels {
        1 => GrayImage::from_raw(width, height, data)
            .expect("buffer length matches dimensions")
            .save(path.as_ref())?,
        3 => RgbImage::from_raw(width, height, data)
            .expect("buffer length matches dimensions")
            .save(path.as_ref())?,
        4 => RgbaImage::from_raw(width, height, data)
            .expect("buffer length matches dimensions")
            .save(path.as_ref())?,
        other => return Err(Error::UnsupportedShape(other)),
    }

    Ok(())
}

/// Convenience check used before handing a decoded array to the filters.
pub fn channels_supported(channels: usize) -> Result<()> {
    match channels {
        1 | 3 | 4 => Ok(()),
        other => Err(Error::UnsupportedShape(other)),
    }
}
