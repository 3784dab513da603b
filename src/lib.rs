//! Spatial-domain image filtering: rectangular correlation masks with bias
//! and activation, plus contrast enhancement through global histogram
//! equalization and local min/max expansion.
//!
//! ## Image Format
//! Images are (height, width, channels) `ndarray` buffers:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! The alpha channel, when present, is carried through unmodified and
//! never filtered. Persisted buffers are 8-bit per channel; raw
//! correlation responses are `f32`, signed and unbounded until
//! post-processed back into displayable range.
//!
//! ## Architecture
//! - [`mask`] - validated mask descriptors and their text format
//! - [`filters`] - the numeric engines, pure functions over buffers
//! - [`pipeline`] - explicit run configuration and the combined
//!   equalize-and-expand pipeline
//! - [`io`] - raster decode/encode at the crate boundary
//!
//! All operations are synchronous and functional over their inputs; the
//! correlation engine processes color channels in parallel, which is safe
//! because per-pixel work is independent.

pub mod error;
pub mod filters;
pub mod io;
pub mod mask;
pub mod pipeline;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Error, Result};
pub use crate::mask::{Activation, MaskDescriptor};
pub use crate::pipeline::{equalize_and_expand, Operation, PipelineConfig};
