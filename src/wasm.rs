//! WebAssembly bindings for dctsweep-rs.
//!
//! This module provides JavaScript-compatible functions via wasm-bindgen
//! for use in browsers and Node.js. The pixel-level helper is also built
//! natively so it can be tested without a wasm runtime.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::error::CodecError;
use crate::grid::Grid;
use crate::jpeg1::codec::{Codec, CodecConfig};
use crate::jpeg1::quantization::QuantizationTable;

/// Runs a quality sweep over 8-bit grayscale pixels and returns the
/// entropies together with 8-bit reconstructions, one per quality factor.
pub fn sweep_pixels(
    pixels: &[u8],
    width: usize,
    height: usize,
    qualities: &[f64],
) -> Result<(Vec<f64>, Vec<Vec<u8>>), CodecError> {
    let image = Grid::from_pixels(width, height, pixels)?;
    // Browsers give no thread pool without extra setup.
    let config = CodecConfig {
        parallel: !cfg!(target_arch = "wasm32"),
        ..CodecConfig::default()
    };
    let codec = Codec::with_config(QuantizationTable::standard_luminance(), config);
    let (reconstructions, entropies) = codec.run(&image, qualities)?.into_parts()?;
    let pixels = reconstructions.iter().map(Grid::to_pixels).collect();
    Ok((entropies, pixels))
}

/// Sweep results handed to JavaScript.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WasmSweep {
    entropies: Vec<f64>,
    reconstructions: Vec<Vec<u8>>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WasmSweep {
    /// Entropy per quality factor, in request order.
    pub fn entropies(&self) -> Vec<f64> {
        self.entropies.clone()
    }

    /// Reconstructed 8-bit pixels for the quality factor at `index`.
    pub fn reconstruction(&self, index: usize) -> Result<Vec<u8>, JsValue> {
        self.reconstructions
            .get(index)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&format!("No run at index {}", index)))
    }
}

/// Compress and reconstruct a grayscale image at every quality factor.
///
/// # Arguments
/// * `pixels` - Row-major 8-bit grayscale samples
/// * `width`, `height` - Image dimensions, multiples of 8
/// * `qualities` - Quality factors, all greater than zero
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn sweep_gray(
    pixels: &[u8],
    width: u32,
    height: u32,
    qualities: &[f64],
) -> Result<WasmSweep, JsValue> {
    let (entropies, reconstructions) =
        sweep_pixels(pixels, width as usize, height as usize, qualities)
            .map_err(|e| JsValue::from_str(&format!("Sweep error: {}", e)))?;
    Ok(WasmSweep {
        entropies,
        reconstructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_pixels_constant_image() {
        let pixels = vec![128u8; 64];
        let (entropies, reconstructions) = sweep_pixels(&pixels, 8, 8, &[1.0, 8.0]).unwrap();
        assert_eq!(entropies, vec![0.0, 0.0]);
        assert_eq!(reconstructions, vec![pixels.clone(), pixels]);
    }

    #[test]
    fn test_sweep_pixels_rejects_short_buffer() {
        let err = sweep_pixels(&[0u8; 10], 8, 8, &[1.0]).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidSampleCount {
                expected: 64,
                actual: 10
            }
        );
    }
}
