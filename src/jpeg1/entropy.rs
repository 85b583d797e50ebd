//! Shannon entropy of quantized coefficient grids.
//!
//! The entropy of the empirical value distribution is the average number of
//! bits per coefficient an ideal entropy coder would need. No bitstream is
//! produced; the value is a size estimate.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::constants::ENTROPY_DECIMALS;
use crate::jpeg1::dct::BLOCK_SIZE;

/// Rounds `value` to `decimals` digits after the decimal point.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Entropy in bits/symbol of the distinct values in `values`, rounded to
/// four decimals. Symbols are summed in ascending order so the result does
/// not depend on the order of the input.
pub fn shannon_entropy<T: Ord + Copy>(values: &[T]) -> f64 {
    let mut histogram: BTreeMap<T, usize> = BTreeMap::new();
    for &v in values {
        *histogram.entry(v).or_insert(0) += 1;
    }
    entropy_from_counts(histogram.values().copied(), values.len())
}

/// Entropy of real-valued samples, keyed on exact value. `-0.0` and `0.0`
/// count as the same symbol.
pub fn shannon_entropy_f64(values: &[f64]) -> f64 {
    let keys: Vec<ExactValue> = values.iter().map(|&v| ExactValue::new(v)).collect();
    shannon_entropy(&keys)
}

fn entropy_from_counts(counts: impl Iterator<Item = usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut sum = 0.0f64;
    for count in counts {
        let p = count as f64 / total;
        sum -= p * p.log2();
    }
    round_to_decimals(sum, ENTROPY_DECIMALS)
}

#[derive(Debug, Clone, Copy)]
struct ExactValue(f64);

impl ExactValue {
    fn new(v: f64) -> Self {
        // Adding 0.0 maps -0.0 onto +0.0.
        Self(v + 0.0)
    }
}

impl PartialEq for ExactValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ExactValue {}

impl PartialOrd for ExactValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Nonzero-coefficient counts of a quantized grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoefficientStats {
    pub blocks: usize,
    pub total: usize,
    pub nonzero: usize,
    /// Blocks whose DC coefficient survived quantization.
    pub dc_nonzero: usize,
}

impl CoefficientStats {
    /// Collects statistics from a block-tiled grid stored row-major with
    /// `width` columns.
    pub fn from_grid(coefficients: &[i32], width: usize) -> Self {
        let mut stats = CoefficientStats {
            total: coefficients.len(),
            nonzero: coefficients.iter().filter(|&&c| c != 0).count(),
            ..Default::default()
        };
        if width == 0 {
            return stats;
        }
        let band_len = width * BLOCK_SIZE;
        for band in coefficients.chunks_exact(band_len) {
            for bx in 0..width / BLOCK_SIZE {
                stats.blocks += 1;
                if band[bx * BLOCK_SIZE] != 0 {
                    stats.dc_nonzero += 1;
                }
            }
        }
        stats
    }

    pub fn dc_survival_rate(&self) -> f64 {
        if self.blocks == 0 {
            return 0.0;
        }
        self.dc_nonzero as f64 / self.blocks as f64
    }

    pub fn nonzero_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.nonzero as f64 / self.total as f64
    }
}
