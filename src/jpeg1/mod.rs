//! Baseline DCT pipeline (after ISO/IEC 10918-1 / ITU-T T.81)
//!
//! Grayscale only, 8x8 blocks, no bitstream: coefficient grids are scored
//! by their Shannon entropy instead of being Huffman coded.
//!
//! - `dct`: forward/inverse 8x8 DCT-II (direct and separable forms).
//! - `quantization`: quantization tables, quality factors, (de)quantization.
//! - `entropy`: entropy estimate and coefficient statistics.
//! - `codec`: tiling and quality-factor sweeps.

pub mod codec;
pub mod dct;
pub mod entropy;
pub mod quantization;

pub use codec::{Codec, CodecConfig, RunOutput, Sweep};
