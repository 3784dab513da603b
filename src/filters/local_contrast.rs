//! Local contrast expansion via sliding-window min/max.
//!
//! Local minimum and maximum are rectangular morphological erosion and
//! dilation: an m*n all-ones window anchored at its center (anchor row
//! m/2, column n/2), with samples past the image border ignored. Each
//! pixel is then rescaled against its local range:
//!
//! ```text
//! out = clamp(round((p - local_min) * 255 / (local_max - local_min)), 0, 255)
//! ```
//!
//! Where `local_max == local_min` there is no contrast to expand and the
//! pixel passes through unchanged.
//!
//! The window extrema are separable, so they are computed as a row pass
//! followed by a column pass, each using a monotonic deque that keeps the
//! per-pixel cost amortized O(1) instead of O(m*n).
//!
//! ## Supported Formats
//!
//! The multi-channel entry accepts images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - expands the single channel
//! - **RGB**: (height, width, 3) - expands all 3 channels independently
//! - **RGBA**: (height, width, 4) - expands RGB, preserves alpha

use std::collections::VecDeque;

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{Error, Result};

/// Reject empty window dimensions before any pixel work.
pub fn validate_window(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidWindow { rows, cols });
    }
    Ok(())
}

/// Windowed minimum over one scanline.
///
/// The window spans `window / 2` samples behind the anchor and
/// `(window - 1) / 2` ahead, truncated at both ends of the line.
fn sliding_min(line: &[u8], window: usize) -> Vec<u8> {
    let len = line.len();
    let lag = window / 2;
    let lead = (window - 1) / 2;

    let mut deque: VecDeque<usize> = VecDeque::new();
    let mut out = Vec::with_capacity(len);
    let mut next = 0usize;

    for i in 0..len {
        let hi = (i + lead).min(len - 1);
        while next <= hi {
            while deque.back().is_some_and(|&back| line[back] >= line[next]) {
                deque.pop_back();
            }
            deque.push_back(next);
            next += 1;
        }
        let lo = i.saturating_sub(lag);
        while deque.front().is_some_and(|&front| front < lo) {
            deque.pop_front();
        }
        // The window always contains i itself, so the deque is nonempty.
        out.push(line[deque[0]]);
    }

    out
}

/// Windowed maximum over one scanline.
fn sliding_max(line: &[u8], window: usize) -> Vec<u8> {
    let len = line.len();
    let lag = window / 2;
    let lead = (window - 1) / 2;

    let mut deque: VecDeque<usize> = VecDeque::new();
    let mut out = Vec::with_capacity(len);
    let mut next = 0usize;

    for i in 0..len {
        let hi = (i + lead).min(len - 1);
        while next <= hi {
            while deque.back().is_some_and(|&back| line[back] <= line[next]) {
                deque.pop_back();
            }
            deque.push_back(next);
            next += 1;
        }
        let lo = i.saturating_sub(lag);
        while deque.front().is_some_and(|&front| front < lo) {
            deque.pop_front();
        }
        out.push(line[deque[0]]);
    }

    out
}

/// Rectangular erosion: per-pixel minimum over the window.
pub fn erode_channel(
    channel: ArrayView2<u8>,
    window_rows: usize,
    window_cols: usize,
) -> Result<Array2<u8>> {
    validate_window(window_rows, window_cols)?;
    let (height, width) = channel.dim();

    let mut row_pass = Array2::<u8>::zeros((height, width));
    let mut line = Vec::with_capacity(width.max(height));
    for y in 0..height {
        line.clear();
        line.extend(channel.row(y).iter().copied());
        for (x, &v) in sliding_min(&line, window_cols).iter().enumerate() {
            row_pass[[y, x]] = v;
        }
    }

    let mut output = Array2::<u8>::zeros((height, width));
    for x in 0..width {
        line.clear();
        line.extend(row_pass.column(x).iter().copied());
        for (y, &v) in sliding_min(&line, window_rows).iter().enumerate() {
            output[[y, x]] = v;
        }
    }

    Ok(output)
}

/// Rectangular dilation: per-pixel maximum over the window.
pub fn dilate_channel(
    channel: ArrayView2<u8>,
    window_rows: usize,
    window_cols: usize,
) -> Result<Array2<u8>> {
    validate_window(window_rows, window_cols)?;
    let (height, width) = channel.dim();

    let mut row_pass = Array2::<u8>::zeros((height, width));
    let mut line = Vec::with_capacity(width.max(height));
    for y in 0..height {
        line.clear();
        line.extend(channel.row(y).iter().copied());
        for (x, &v) in sliding_max(&line, window_cols).iter().enumerate() {
            row_pass[[y, x]] = v;
        }
    }

    let mut output = Array2::<u8>::zeros((height, width));
    for x in 0..width {
        line.clear();
        line.extend(row_pass.column(x).iter().copied());
        for (y, &v) in sliding_max(&line, window_rows).iter().enumerate() {
            output[[y, x]] = v;
        }
    }

    Ok(output)
}

/// Expand the contrast of a single channel against its local range.
///
/// # Arguments
/// * `channel` - 8-bit buffer (height, width)
/// * `window_rows` / `window_cols` - structuring window shape, both > 0
///
/// # Returns
/// Expanded channel; pixels with a flat neighborhood are unchanged
pub fn expand_channel(
    channel: ArrayView2<u8>,
    window_rows: usize,
    window_cols: usize,
) -> Result<Array2<u8>> {
    validate_window(window_rows, window_cols)?;

    let local_min = erode_channel(channel, window_rows, window_cols)?;
    let local_max = dilate_channel(channel, window_rows, window_cols)?;

    let (height, width) = channel.dim();
    let mut output = Array2::<u8>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let v = channel[[y, x]];
            let lo = local_min[[y, x]];
            let hi = local_max[[y, x]];
            output[[y, x]] = if hi == lo {
                v
            } else {
                let stretched = (v - lo) as f32 * 255.0 / (hi - lo) as f32;
                stretched.round().clamp(0.0, 255.0) as u8
            };
        }
    }

    Ok(output)
}

/// Expand every color channel of an image independently.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `window_rows` / `window_cols` - structuring window shape, both > 0
///
/// # Returns
/// Expanded image with same channel count, alpha preserved
pub fn expand_u8(
    input: ArrayView3<u8>,
    window_rows: usize,
    window_cols: usize,
) -> Result<Array3<u8>> {
    validate_window(window_rows, window_cols)?;

    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    for c in 0..color_channels {
        let expanded = expand_channel(input.index_axis(Axis(2), c), window_rows, window_cols)?;
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
