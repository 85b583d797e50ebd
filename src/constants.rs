// Side length of a transform block (K).
pub const BLOCK_SIZE: usize = 8;

// Number of samples in one block.
pub const BLOCK_DIM: usize = BLOCK_SIZE * BLOCK_SIZE;

// Offset that centres 8-bit samples around zero before the forward transform.
pub const LEVEL_SHIFT: f64 = 128.0;

// Peak sample value used for PSNR.
pub const MAX_SAMPLE_VALUE: f64 = 255.0;

// Entropy values are reported with this many decimal digits.
pub const ENTROPY_DECIMALS: i32 = 4;

// Quality factors swept when the caller does not supply any.
pub const DEFAULT_QUALITY_FACTORS: [f64; 5] = [0.1, 0.5, 2.0, 8.0, 32.0];
