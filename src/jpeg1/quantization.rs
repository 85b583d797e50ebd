//! Quantization implementation for baseline JPEG.
//! Handles quantization tables, quality factors and the (de)quantization of
//! DCT coefficients.

use crate::error::CodecError;
use crate::jpeg1::dct::{BLOCK_DIM, BLOCK_SIZE};

/// Standard JPEG luminance quantization table (ITU-T T.81, Annex K.1).
pub const STD_LUMINANCE_QUANT_TABLE: [u16; BLOCK_DIM] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Base step sizes for the 64 coefficients of a block, row-major by
/// frequency (`u * 8 + v`). Every entry is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationTable {
    values: [u16; BLOCK_DIM],
}

impl QuantizationTable {
    pub fn new(values: [u16; BLOCK_DIM]) -> Result<Self, CodecError> {
        if let Some(index) = values.iter().position(|&v| v == 0) {
            return Err(CodecError::InvalidQuantizationTable { index });
        }
        Ok(Self { values })
    }

    pub fn standard_luminance() -> Self {
        Self {
            values: STD_LUMINANCE_QUANT_TABLE,
        }
    }

    pub fn values(&self) -> &[u16; BLOCK_DIM] {
        &self.values
    }

    pub fn get(&self, u: usize, v: usize) -> u16 {
        self.values[u * BLOCK_SIZE + v]
    }
}

impl Default for QuantizationTable {
    fn default() -> Self {
        Self::standard_luminance()
    }
}

/// Multiplier applied to every entry of the quantization table. Larger
/// values mean coarser steps and more coefficients rounded to zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct QualityFactor(f64);

impl QualityFactor {
    pub fn new(value: f64) -> Result<Self, CodecError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CodecError::InvalidQualityFactor(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for QualityFactor {
    type Error = CodecError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[inline]
fn step_size(quality: QualityFactor, table: &QuantizationTable, i: usize) -> f64 {
    quality.0 * table.values[i] as f64
}

/// Quantizes DCT coefficients: divides by `quality * table` and rounds
/// half to even.
///
/// Fails with [`CodecError::CoefficientOverflow`] when a rounded value does
/// not fit in an `i32`, which happens for very small quality factors.
pub fn quantize_block(
    dct_block: &[f64; BLOCK_DIM],
    quality: QualityFactor,
    table: &QuantizationTable,
    output: &mut [i32; BLOCK_DIM],
) -> Result<(), CodecError> {
    const RANGE: std::ops::RangeInclusive<f64> = i32::MIN as f64..=i32::MAX as f64;
    for i in 0..BLOCK_DIM {
        let level = (dct_block[i] / step_size(quality, table, i)).round_ties_even();
        if !RANGE.contains(&level) {
            return Err(CodecError::CoefficientOverflow(quality.0));
        }
        output[i] = level as i32;
    }
    Ok(())
}

/// De-quantizes coefficients by multiplying with `quality * table`.
pub fn dequantize_block(
    quant_block: &[i32; BLOCK_DIM],
    quality: QualityFactor,
    table: &QuantizationTable,
    output: &mut [f64; BLOCK_DIM],
) {
    for i in 0..BLOCK_DIM {
        output[i] = quant_block[i] as f64 * step_size(quality, table, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rejects_zero_entry() {
        let mut values = STD_LUMINANCE_QUANT_TABLE;
        values[17] = 0;
        assert_eq!(
            QuantizationTable::new(values),
            Err(CodecError::InvalidQuantizationTable { index: 17 })
        );
        assert_eq!(
            QuantizationTable::new(STD_LUMINANCE_QUANT_TABLE).unwrap(),
            QuantizationTable::standard_luminance()
        );
    }

    #[test]
    fn test_table_lookup() {
        let table = QuantizationTable::standard_luminance();
        assert_eq!(table.get(0, 0), 16);
        assert_eq!(table.get(0, 1), 11);
        assert_eq!(table.get(1, 0), 12);
        assert_eq!(table.get(7, 7), 99);
    }

    #[test]
    fn test_quality_factor_validation() {
        assert!(QualityFactor::new(0.1).is_ok());
        assert_eq!(
            QualityFactor::new(0.0),
            Err(CodecError::InvalidQualityFactor(0.0))
        );
        assert!(QualityFactor::new(-2.0).is_err());
        assert!(QualityFactor::new(f64::NAN).is_err());
        assert!(QualityFactor::new(f64::INFINITY).is_err());
        assert!(QualityFactor::try_from(8.0).is_ok());
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        let table = QuantizationTable::new([1; BLOCK_DIM]).unwrap();
        let q = QualityFactor::new(1.0).unwrap();
        let mut input = [0.0f64; BLOCK_DIM];
        input[..6].copy_from_slice(&[0.5, 1.5, 2.5, -0.5, -1.5, -2.5]);
        let mut output = [0i32; BLOCK_DIM];
        quantize_block(&input, q, &table, &mut output).unwrap();
        assert_eq!(&output[..6], &[0, 2, 2, 0, -2, -2]);
    }

    #[test]
    fn test_out_of_range_level_is_rejected() {
        let table = QuantizationTable::standard_luminance();
        let q = QualityFactor::new(1e-9).unwrap();
        let mut input = [0.0f64; BLOCK_DIM];
        input[0] = 1016.0;
        let mut output = [0i32; BLOCK_DIM];
        assert_eq!(
            quantize_block(&input, q, &table, &mut output),
            Err(CodecError::CoefficientOverflow(1e-9))
        );

        // Largest representable level still passes.
        let unit = QuantizationTable::new([1; BLOCK_DIM]).unwrap();
        let one = QualityFactor::new(1.0).unwrap();
        input[0] = i32::MAX as f64;
        input[1] = i32::MIN as f64;
        quantize_block(&input, one, &unit, &mut output).unwrap();
        assert_eq!(&output[..2], &[i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_dequantize_error_is_bounded_by_half_step() {
        let table = QuantizationTable::standard_luminance();
        for &qf in &[0.1, 0.5, 2.0, 8.0, 32.0] {
            let q = QualityFactor::new(qf).unwrap();
            let input: [f64; BLOCK_DIM] =
                std::array::from_fn(|i| (i as f64 * 37.3).sin() * 900.0);
            let mut quantized = [0i32; BLOCK_DIM];
            let mut restored = [0.0f64; BLOCK_DIM];
            quantize_block(&input, q, &table, &mut quantized).unwrap();
            dequantize_block(&quantized, q, &table, &mut restored);
            for i in 0..BLOCK_DIM {
                let step = qf * table.values()[i] as f64;
                assert!(
                    (input[i] - restored[i]).abs() <= 0.5 * step + 1e-9,
                    "q={} i={}: {} vs {}",
                    qf,
                    i,
                    input[i],
                    restored[i]
                );
            }
        }
    }

    #[test]
    fn test_coarser_quality_zeroes_more_coefficients() {
        let table = QuantizationTable::standard_luminance();
        let input: [f64; BLOCK_DIM] = std::array::from_fn(|i| 200.0 / (1 + i) as f64);
        let mut previous = usize::MAX;
        for &qf in &[0.1, 0.5, 2.0, 8.0, 32.0] {
            let mut quantized = [0i32; BLOCK_DIM];
            quantize_block(&input, QualityFactor::new(qf).unwrap(), &table, &mut quantized).unwrap();
            let nonzero = quantized.iter().filter(|&&c| c != 0).count();
            assert!(nonzero <= previous);
            previous = nonzero;
        }
        assert_eq!(previous, 0);
    }
}
