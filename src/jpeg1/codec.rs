//! Baseline codec orchestration: tiling, forward transform and quantization,
//! entropy estimation, and reconstruction for a sweep of quality factors.

use log::{debug, warn};
use rayon::prelude::*;

use crate::constants::LEVEL_SHIFT;
use crate::error::CodecError;
use crate::grid::{Grid, ScanOrder};
use crate::jpeg1::dct::{BLOCK_DIM, fdct_8x8, idct_8x8};
use crate::jpeg1::entropy::{CoefficientStats, shannon_entropy};
use crate::jpeg1::quantization::{
    QualityFactor, QuantizationTable, dequantize_block, quantize_block,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Run quality factors and blocks on the rayon pool.
    pub parallel: bool,
    /// Block visiting order when `parallel` is off.
    pub scan_order: ScanOrder,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            scan_order: ScanOrder::RowMajor,
        }
    }
}

/// Result of compressing one image at one quality factor.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub quality: QualityFactor,
    /// Quantized coefficients, block-tiled like the source image.
    pub coefficients: Grid<i32>,
    /// Entropy of `coefficients` in bits/symbol, rounded to 4 decimals.
    pub entropy: f64,
    /// Reconstructed samples in the original (uncentered) range.
    pub reconstruction: Grid<f64>,
    pub stats: CoefficientStats,
}

/// Outputs of [`Codec::run`], one slot per requested quality factor in
/// request order. A slot holds either a complete run or the reason it was
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    runs: Vec<Result<RunOutput, CodecError>>,
}

impl Sweep {
    pub fn runs(&self) -> &[Result<RunOutput, CodecError>] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Consumes the sweep, keeping every slot.
    pub fn into_runs(self) -> Vec<Result<RunOutput, CodecError>> {
        self.runs
    }

    /// Splits the sweep into reconstructions and entropies, failing with the
    /// first rejected run.
    pub fn into_parts(self) -> Result<(Vec<Grid<f64>>, Vec<f64>), CodecError> {
        let mut reconstructions = Vec::with_capacity(self.runs.len());
        let mut entropies = Vec::with_capacity(self.runs.len());
        for run in self.runs {
            let run = run?;
            reconstructions.push(run.reconstruction);
            entropies.push(run.entropy);
        }
        Ok((reconstructions, entropies))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Codec {
    table: QuantizationTable,
    config: CodecConfig,
}

impl Codec {
    pub fn new(table: QuantizationTable) -> Self {
        Self {
            table,
            config: CodecConfig::default(),
        }
    }

    pub fn with_config(table: QuantizationTable, config: CodecConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &QuantizationTable {
        &self.table
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compresses and reconstructs `image` once per quality factor.
    ///
    /// `image` holds raw samples (0..=255 for 8-bit input). It is centered
    /// once into a private copy before the sweep; the caller's grid is not
    /// modified. Misaligned dimensions fail the whole call. A non-positive
    /// quality factor only fails its own slot in the returned [`Sweep`], as
    /// does a quality factor so small that a coefficient overflows `i32`.
    pub fn run(&self, image: &Grid<f64>, quality_factors: &[f64]) -> Result<Sweep, CodecError> {
        image.validate_block_aligned()?;
        debug!(
            "sweeping {}x{} image ({} blocks) over {} quality factors",
            image.width(),
            image.height(),
            image.block_count(),
            quality_factors.len()
        );

        let centered = image.shifted(-LEVEL_SHIFT);
        let run_one = |&value: &f64| -> Result<RunOutput, CodecError> {
            let quality = QualityFactor::new(value).inspect_err(|e| warn!("skipping run: {}", e))?;
            self.compress(&centered, quality)
        };

        let runs: Vec<Result<RunOutput, CodecError>> = if self.config.parallel {
            quality_factors.par_iter().map(run_one).collect()
        } else {
            quality_factors.iter().map(run_one).collect()
        };
        Ok(Sweep { runs })
    }

    /// Runs the full pipeline on an already centered grid and returns the
    /// reconstruction shifted back into the original range.
    pub fn compress(
        &self,
        centered: &Grid<f64>,
        quality: QualityFactor,
    ) -> Result<RunOutput, CodecError> {
        let coefficients = self.forward(centered, quality)?;
        let entropy = shannon_entropy(coefficients.as_slice());
        let stats = CoefficientStats::from_grid(coefficients.as_slice(), coefficients.width());
        let reconstruction = self.inverse(&coefficients, quality)?.shifted(LEVEL_SHIFT);

        debug!(
            "q={} entropy={} nonzero={}/{} dc={}/{}",
            quality.value(),
            entropy,
            stats.nonzero,
            stats.total,
            stats.dc_nonzero,
            stats.blocks
        );

        Ok(RunOutput {
            quality,
            coefficients,
            entropy,
            reconstruction,
            stats,
        })
    }

    /// Forward DCT and quantization of every block of a centered grid.
    pub fn forward(
        &self,
        centered: &Grid<f64>,
        quality: QualityFactor,
    ) -> Result<Grid<i32>, CodecError> {
        let table = &self.table;
        centered.map_blocks(self.config.parallel, self.config.scan_order, |block| {
            let mut dct_coeffs = [0.0f64; BLOCK_DIM];
            fdct_8x8(block, &mut dct_coeffs);
            let mut quantized = [0i32; BLOCK_DIM];
            quantize_block(&dct_coeffs, quality, table, &mut quantized)?;
            Ok(quantized)
        })
    }

    /// Dequantization and inverse DCT of every block. The result is still
    /// centered around zero.
    pub fn inverse(
        &self,
        coefficients: &Grid<i32>,
        quality: QualityFactor,
    ) -> Result<Grid<f64>, CodecError> {
        let table = &self.table;
        coefficients.map_blocks(self.config.parallel, self.config.scan_order, |block| {
            let mut dct_coeffs = [0.0f64; BLOCK_DIM];
            dequantize_block(block, quality, table, &mut dct_coeffs);
            let mut samples = [0.0f64; BLOCK_DIM];
            idct_8x8(&dct_coeffs, &mut samples);
            Ok(samples)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gradient(width: usize, height: usize) -> Grid<f64> {
        Grid::from_fn(width, height, |row, col| ((row * 9 + col * 5) % 256) as f64)
    }

    #[test]
    fn test_run_rejects_misaligned_image() {
        let codec = Codec::default();
        let err = codec.run(&Grid::filled(12, 8, 0.0), &[1.0]).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidDimensions {
                width: 12,
                height: 8,
                block_size: 8
            }
        );
    }

    #[test]
    fn test_run_does_not_mutate_input() {
        let image = gradient(16, 16);
        let before = image.clone();
        Codec::default().run(&image, &[0.5, 2.0]).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn test_forward_inverse_shapes() {
        let codec = Codec::default();
        let centered = gradient(24, 16).shifted(-LEVEL_SHIFT);
        let q = QualityFactor::new(1.0).unwrap();
        let coefficients = codec.forward(&centered, q).unwrap();
        assert_eq!((coefficients.width(), coefficients.height()), (24, 16));
        let restored = codec.inverse(&coefficients, q).unwrap();
        assert_eq!((restored.width(), restored.height()), (24, 16));
    }

    #[test]
    fn test_fine_quality_reconstructs_closely() {
        let image = gradient(16, 16);
        let sweep = Codec::default().run(&image, &[0.001]).unwrap();
        let (reconstructions, _) = sweep.into_parts().unwrap();
        for (a, b) in image.as_slice().iter().zip(reconstructions[0].as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 0.5);
        }
    }

    #[test]
    fn test_coefficient_overflow_fails_only_its_run() {
        let image = Grid::filled(8, 8, 255.0);
        for parallel in [true, false] {
            let codec = Codec::with_config(
                QuantizationTable::standard_luminance(),
                CodecConfig {
                    parallel,
                    ..CodecConfig::default()
                },
            );
            let runs = codec.run(&image, &[1e-9, 0.1]).unwrap().into_runs();
            assert_eq!(runs[0], Err(CodecError::CoefficientOverflow(1e-9)));
            let fine = runs[1].as_ref().unwrap();
            for &v in fine.reconstruction.as_slice() {
                assert_abs_diff_eq!(v, 255.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_accessors_expose_construction_arguments() {
        let table = QuantizationTable::new([3; BLOCK_DIM]).unwrap();
        let config = CodecConfig {
            parallel: false,
            scan_order: ScanOrder::ColumnMajor,
        };
        let codec = Codec::with_config(table, config);
        assert_eq!(codec.table(), &table);
        assert_eq!(codec.config(), &config);
    }

    #[test]
    fn test_into_parts_surfaces_rejected_run() {
        let sweep = Codec::default().run(&gradient(8, 8), &[1.0, -1.0]).unwrap();
        assert_eq!(
            sweep.into_parts().unwrap_err(),
            CodecError::InvalidQualityFactor(-1.0)
        );
    }
}
