//! Correlation mask descriptors and the text format they are read from.
//!
//! A mask description file looks like:
//!
//! ```text
//! 3 3
//! -1 0 1
//! -2 0 2
//! -1 0 1
//! 0
//! Identity
//! ```
//!
//! The first line holds the row and column counts. The next R lines each
//! hold C space-separated real weights, followed by one line with an
//! integer bias in [-255, 255] and one line with the activation keyword,
//! exactly `ReLU` or `Identity`. Blank lines are skipped.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use ndarray::Array2;

use crate::error::{Error, Result};

// ============================================================================
// Activation
// ============================================================================

/// Pointwise function applied to the correlation sum after the bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Pass the value through unchanged.
    Identity,
    /// Clamp negative values to zero.
    ReLU,
}

impl Activation {
    /// Apply the activation to a single correlation response.
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Activation::Identity => value,
            Activation::ReLU => value.max(0.0),
        }
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ReLU" => Ok(Activation::ReLU),
            "Identity" => Ok(Activation::Identity),
            other => Err(Error::InvalidActivation(other.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Identity => write!(f, "Identity"),
            Activation::ReLU => write!(f, "ReLU"),
        }
    }
}

// ============================================================================
// MaskDescriptor
// ============================================================================

/// Validated rectangular correlation mask with bias and activation.
///
/// Constructed once, immutable afterwards; consumed by
/// [`crate::filters::correlation`].
#[derive(Debug, Clone)]
pub struct MaskDescriptor {
    weights: Array2<f32>,
    bias: i32,
    activation: Activation,
}

impl MaskDescriptor {
    /// Build a descriptor from an already-assembled weight matrix.
    ///
    /// # Errors
    /// [`Error::EmptyMask`] if either dimension is zero,
    /// [`Error::InvalidBias`] if the bias falls outside [-255, 255].
    pub fn new(weights: Array2<f32>, bias: i32, activation: Activation) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyMask);
        }
        if !(-255..=255).contains(&bias) {
            return Err(Error::InvalidBias(bias as i64));
        }
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    /// Parse the text format described in the module docs.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let header = lines
            .first()
            .ok_or_else(|| Error::MalformedMask("empty mask description".into()))?;
        let mut fields = header.split_whitespace();
        let rows = parse_dim(fields.next(), "row")?;
        let cols = parse_dim(fields.next(), "column")?;
        if fields.next().is_some() {
            return Err(Error::MalformedMask(format!(
                "header {header:?} has trailing fields"
            )));
        }
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyMask);
        }
        if lines.len() < rows + 3 {
            return Err(Error::MalformedMask(format!(
                "expected {} non-blank lines ({rows} mask rows plus header, bias and activation), found {}",
                rows + 3,
                lines.len()
            )));
        }

        let mut weights = Array2::<f32>::zeros((rows, cols));
        for (r, line) in lines[1..=rows].iter().enumerate() {
            let entries = line
                .split_whitespace()
                .map(|field| {
                    field.parse::<f32>().map_err(|_| {
                        Error::MalformedMask(format!("mask row {r}: {field:?} is not a number"))
                    })
                })
                .collect::<Result<Vec<f32>>>()?;
            if entries.len() != cols {
                return Err(Error::IncompatibleMaskDimensions {
                    row: r,
                    found: entries.len(),
                    expected: cols,
                });
            }
            for (c, &weight) in entries.iter().enumerate() {
                weights[[r, c]] = weight;
            }
        }

        let bias_line = lines[rows + 1];
        let bias: i64 = bias_line.parse().map_err(|_| {
            Error::MalformedMask(format!("bias {bias_line:?} is not an integer"))
        })?;
        if !(-255..=255).contains(&bias) {
            return Err(Error::InvalidBias(bias));
        }

        let activation: Activation = lines[rows + 2].parse()?;

        Self::new(weights, bias as i32, activation)
    }

    /// Read and parse a mask description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Mask height in rows.
    pub fn rows(&self) -> usize {
        self.weights.nrows()
    }

    /// Mask width in columns.
    pub fn cols(&self) -> usize {
        self.weights.ncols()
    }

    /// (rows, columns) of the weight matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// The dense weight matrix.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Constant added to every correlation sum before activation.
    pub fn bias(&self) -> i32 {
        self.bias
    }

    /// The activation applied after the bias.
    pub fn activation(&self) -> Activation {
        self.activation
    }
}

fn parse_dim(field: Option<&str>, what: &str) -> Result<usize> {
    let field = field
        .ok_or_else(|| Error::MalformedMask(format!("header is missing the {what} count")))?;
    field
        .parse()
        .map_err(|_| Error::MalformedMask(format!("{what} count {field:?} is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const SOBEL_H: &str = "3 3\n-1 0 1\n-2 0 2\n-1 0 1\n0\nIdentity\n";

    #[test]
    fn test_parse_full_descriptor() {
        let mask = MaskDescriptor::parse(SOBEL_H).unwrap();

        assert_eq!(mask.shape(), (3, 3));
        assert_eq!(mask.weights()[[1, 0]], -2.0);
        assert_eq!(mask.weights()[[1, 2]], 2.0);
        assert_eq!(mask.bias(), 0);
        assert_eq!(mask.activation(), Activation::Identity);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n1 1\n\n0.5\n\n10\n\nReLU\n\n";
        let mask = MaskDescriptor::parse(text).unwrap();

        assert_eq!(mask.shape(), (1, 1));
        assert_eq!(mask.weights()[[0, 0]], 0.5);
        assert_eq!(mask.bias(), 10);
        assert_eq!(mask.activation(), Activation::ReLU);
    }

    #[test]
    fn test_parse_row_length_mismatch() {
        // Header declares 3 columns, second row only has 2 entries.
        let text = "2 3\n1 2 3\n4 5\n0\nIdentity\n";
        let err = MaskDescriptor::parse(text).unwrap_err();

        match err {
            Error::IncompatibleMaskDimensions {
                row,
                found,
                expected,
            } => {
                assert_eq!(row, 1);
                assert_eq!(found, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("expected dimension error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bias_out_of_range() {
        let text = "1 1\n1\n300\nIdentity\n";
        let err = MaskDescriptor::parse(text).unwrap_err();

        assert!(matches!(err, Error::InvalidBias(300)));
    }

    #[test]
    fn test_parse_unknown_activation() {
        let text = "1 1\n1\n0\nSigmoid\n";
        let err = MaskDescriptor::parse(text).unwrap_err();

        match err {
            Error::InvalidActivation(word) => assert_eq!(word, "Sigmoid"),
            other => panic!("expected activation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_truncated_description() {
        let text = "3 3\n1 2 3\n4 5 6\n";
        assert!(matches!(
            MaskDescriptor::parse(text).unwrap_err(),
            Error::MalformedMask(_)
        ));
    }

    #[test]
    fn test_parse_non_numeric_weight() {
        let text = "1 2\n1 abc\n0\nIdentity\n";
        assert!(matches!(
            MaskDescriptor::parse(text).unwrap_err(),
            Error::MalformedMask(_)
        ));
    }

    #[test]
    fn test_new_rejects_empty_weights() {
        let weights = Array2::<f32>::zeros((0, 3));
        assert!(matches!(
            MaskDescriptor::new(weights, 0, Activation::Identity).unwrap_err(),
            Error::EmptyMask
        ));
    }

    #[test]
    fn test_new_accepts_bias_bounds() {
        let weights = array![[1.0f32]];
        assert!(MaskDescriptor::new(weights.clone(), -255, Activation::Identity).is_ok());
        assert!(MaskDescriptor::new(weights.clone(), 255, Activation::Identity).is_ok());
        assert!(MaskDescriptor::new(weights, -256, Activation::Identity).is_err());
    }

    #[test]
    fn test_activation_apply() {
        assert_eq!(Activation::ReLU.apply(-3.5), 0.0);
        assert_eq!(Activation::ReLU.apply(3.5), 3.5);
        assert_eq!(Activation::Identity.apply(-3.5), -3.5);
    }
}
