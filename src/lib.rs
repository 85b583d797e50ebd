//! Lossy block-transform codec in the style of baseline JPEG.
//!
//! A grayscale image is split into 8x8 blocks, transformed with the DCT,
//! quantized under a quality factor, scored by the Shannon entropy of the
//! quantized coefficients and reconstructed with the inverse transform.

pub mod constants;
pub mod error;
pub mod grid;
pub mod jpeg1;
pub mod wasm;

pub use error::CodecError;
pub use grid::{Grid, ScanOrder};
pub use jpeg1::codec::{Codec, CodecConfig, RunOutput, Sweep};
pub use jpeg1::entropy::{CoefficientStats, shannon_entropy};
pub use jpeg1::quantization::{QualityFactor, QuantizationTable};
