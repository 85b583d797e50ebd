use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CodecError {
    #[error("Invalid dimensions {width}x{height}: must be non-zero multiples of {block_size}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        block_size: usize,
    },
    #[error("Invalid quality factor {0}: must be finite and greater than zero")]
    InvalidQualityFactor(f64),
    #[error("Invalid quantization table: entry {index} is zero")]
    InvalidQuantizationTable { index: usize },
    #[error("Invalid sample count: expected {expected}, got {actual}")]
    InvalidSampleCount { expected: usize, actual: usize },
    #[error("Coefficient overflow at quality factor {0}: quantized value exceeds i32 range")]
    CoefficientOverflow(f64),
    #[error("Dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}
