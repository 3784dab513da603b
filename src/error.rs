//! Error types shared across the crate.
//!
//! Every failure here is fatal and synchronous: validation errors surface
//! at the point of construction or invocation, before any pixel work, and
//! nothing is retried. Numeric degeneracies (constant channels, single
//! intensity histograms) are defined outputs of the filters, not errors.

use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A mask row does not hold the number of entries the header declared.
    #[error("incompatible mask dimensions: row {row} has {found} entries, expected {expected}")]
    IncompatibleMaskDimensions {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// Mask bias outside the accepted range.
    #[error("invalid bias: {0} is outside [-255, 255]")]
    InvalidBias(i64),

    /// Activation keyword other than the two accepted values.
    #[error("invalid activation: expected \"ReLU\" or \"Identity\", got {0:?}")]
    InvalidActivation(String),

    /// Mask description text that cannot be read at all (truncated file,
    /// non-numeric fields, garbled header).
    #[error("malformed mask description: {0}")]
    MalformedMask(String),

    /// A mask must have at least one row and one column.
    #[error("mask must have at least one row and one column")]
    EmptyMask,

    /// Structuring window with a zero dimension.
    #[error("invalid window: dimensions must be positive, got {rows}x{cols}")]
    InvalidWindow { rows: usize, cols: usize },

    /// Channel count the filters do not understand.
    #[error("unsupported image shape: {0} channels, expected 1, 3 or 4")]
    UnsupportedShape(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
