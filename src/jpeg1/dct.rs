//! Discrete Cosine Transform (DCT) implementation for 8x8 blocks.
//!
//! Blocks are row-major: `block[x * 8 + y]` is sample `(x, y)` and
//! `coeffs[u * 8 + v]` is frequency `(u, v)`. The transform pair is
//! orthonormal, so `idct_8x8(fdct_8x8(b)) == b` up to rounding.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::LazyLock;

pub use crate::constants::{BLOCK_DIM, BLOCK_SIZE};

// COS_TABLE[u][x] = cos((2x + 1) * u * pi / 16)
static COS_TABLE: LazyLock<[[f64; BLOCK_SIZE]; BLOCK_SIZE]> = LazyLock::new(|| {
    let mut table = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for (u, row) in table.iter_mut().enumerate() {
        for (x, entry) in row.iter_mut().enumerate() {
            *entry = basis_cos(x, u);
        }
    }
    table
});

#[inline]
fn norm_coeff(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

#[inline]
fn basis_cos(x: usize, u: usize) -> f64 {
    (((2 * x + 1) * u) as f64 * PI / (2 * BLOCK_SIZE) as f64).cos()
}

/// Forward DCT by direct quadruple summation.
pub fn fdct_8x8_direct(input: &[f64; BLOCK_DIM], output: &mut [f64; BLOCK_DIM]) {
    for u in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            let mut sum = 0.0f64;
            for x in 0..BLOCK_SIZE {
                for y in 0..BLOCK_SIZE {
                    sum += input[x * BLOCK_SIZE + y] * basis_cos(x, u) * basis_cos(y, v);
                }
            }
            output[u * BLOCK_SIZE + v] = 0.25 * norm_coeff(u) * norm_coeff(v) * sum;
        }
    }
}

/// Inverse DCT by direct quadruple summation.
pub fn idct_8x8_direct(input: &[f64; BLOCK_DIM], output: &mut [f64; BLOCK_DIM]) {
    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            let mut sum = 0.0f64;
            for u in 0..BLOCK_SIZE {
                for v in 0..BLOCK_SIZE {
                    sum += norm_coeff(u)
                        * norm_coeff(v)
                        * input[u * BLOCK_SIZE + v]
                        * basis_cos(x, u)
                        * basis_cos(y, v);
                }
            }
            output[x * BLOCK_SIZE + y] = 0.25 * sum;
        }
    }
}

/// Separable forward DCT: rows first, then columns.
pub fn fdct_8x8(input: &[f64; BLOCK_DIM], output: &mut [f64; BLOCK_DIM]) {
    let table = &*COS_TABLE;

    // tmp[x][v] = sum_y input[x][y] * cos(y, v)
    let mut tmp = [0.0f64; BLOCK_DIM];
    for x in 0..BLOCK_SIZE {
        let row = &input[x * BLOCK_SIZE..(x + 1) * BLOCK_SIZE];
        for v in 0..BLOCK_SIZE {
            tmp[x * BLOCK_SIZE + v] = row.iter().zip(&table[v]).map(|(s, c)| s * c).sum();
        }
    }

    for u in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            let mut sum = 0.0f64;
            for x in 0..BLOCK_SIZE {
                sum += table[u][x] * tmp[x * BLOCK_SIZE + v];
            }
            output[u * BLOCK_SIZE + v] = 0.25 * norm_coeff(u) * norm_coeff(v) * sum;
        }
    }
}

/// Separable inverse DCT.
pub fn idct_8x8(input: &[f64; BLOCK_DIM], output: &mut [f64; BLOCK_DIM]) {
    let table = &*COS_TABLE;

    // tmp[u][y] = sum_v c(v) * input[u][v] * cos(y, v)
    let mut tmp = [0.0f64; BLOCK_DIM];
    for u in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            let mut sum = 0.0f64;
            for v in 0..BLOCK_SIZE {
                sum += norm_coeff(v) * input[u * BLOCK_SIZE + v] * table[v][y];
            }
            tmp[u * BLOCK_SIZE + y] = sum;
        }
    }

    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            let mut sum = 0.0f64;
            for u in 0..BLOCK_SIZE {
                sum += norm_coeff(u) * table[u][x] * tmp[u * BLOCK_SIZE + y];
            }
            output[x * BLOCK_SIZE + y] = 0.25 * sum;
        }
    }
}
