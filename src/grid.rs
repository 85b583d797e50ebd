//! Row-major sample and coefficient grids tiled into 8x8 blocks.
//!
//! A grid of `height` rows by `width` columns is addressed as `(row, col)`.
//! Block `(bx, by)` covers rows `by * 8..by * 8 + 8` and columns
//! `bx * 8..bx * 8 + 8`; inside a block, samples are stored row-major
//! (`index = row * 8 + col`), the layout the transform functions expect.

use rayon::prelude::*;

use crate::constants::{BLOCK_DIM, BLOCK_SIZE, MAX_SAMPLE_VALUE};
use crate::error::CodecError;

/// Order in which blocks are visited when a grid is processed sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Left to right, then top to bottom.
    #[default]
    RowMajor,
    /// Top to bottom, then left to right.
    ColumnMajor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Wraps row-major `data` of `height` rows by `width` columns.
    pub fn new(width: usize, height: usize, data: Vec<T>) -> Result<Self, CodecError> {
        let expected = cell_count(width, height).ok_or(CodecError::InvalidDimensions {
            width,
            height,
            block_size: BLOCK_SIZE,
        })?;
        if data.len() != expected {
            return Err(CodecError::InvalidSampleCount {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; checked_cell_count(width, height)],
        }
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(checked_cell_count(width, height));
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.height && col < self.width {
            Some(self.data[row * self.width + col])
        } else {
            None
        }
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn blocks_wide(&self) -> usize {
        self.width / BLOCK_SIZE
    }

    pub fn blocks_tall(&self) -> usize {
        self.height / BLOCK_SIZE
    }

    pub fn block_count(&self) -> usize {
        self.blocks_wide() * self.blocks_tall()
    }

    /// Fails unless both dimensions are non-zero multiples of the block size.
    pub fn validate_block_aligned(&self) -> Result<(), CodecError> {
        if self.width == 0
            || self.height == 0
            || self.width % BLOCK_SIZE != 0
            || self.height % BLOCK_SIZE != 0
        {
            return Err(CodecError::InvalidDimensions {
                width: self.width,
                height: self.height,
                block_size: BLOCK_SIZE,
            });
        }
        Ok(())
    }

    /// Copies block `(bx, by)` out of the grid.
    ///
    /// # Panics
    ///
    /// Panics if the block lies outside the grid.
    pub fn block(&self, bx: usize, by: usize) -> [T; BLOCK_DIM] {
        let origin = by * BLOCK_SIZE * self.width + bx * BLOCK_SIZE;
        std::array::from_fn(|i| {
            self.data[origin + (i / BLOCK_SIZE) * self.width + i % BLOCK_SIZE]
        })
    }

    /// Overwrites block `(bx, by)`.
    ///
    /// # Panics
    ///
    /// Panics if the block lies outside the grid.
    pub fn set_block(&mut self, bx: usize, by: usize, block: &[T; BLOCK_DIM]) {
        let band_len = BLOCK_SIZE * self.width;
        let band = &mut self.data[by * band_len..(by + 1) * band_len];
        write_block(band, self.width, bx, block);
    }

    /// Applies `f` to every block independently and assembles the results
    /// into a grid of the same shape.
    ///
    /// With `parallel` set, 8-row bands of the output are handed to the
    /// rayon pool; every band is written by exactly one worker. Otherwise
    /// blocks are visited in `order`. Both paths produce identical grids.
    /// Fails if the grid is not block aligned or if `f` fails on any block.
    pub fn map_blocks<U, F>(
        &self,
        parallel: bool,
        order: ScanOrder,
        f: F,
    ) -> Result<Grid<U>, CodecError>
    where
        T: Sync,
        U: Copy + Default + Send,
        F: Fn(&[T; BLOCK_DIM]) -> Result<[U; BLOCK_DIM], CodecError> + Sync,
    {
        self.validate_block_aligned()?;
        let mut out = Grid::filled(self.width, self.height, U::default());

        if parallel {
            let width = self.width;
            out.data
                .par_chunks_mut(BLOCK_SIZE * width)
                .enumerate()
                .try_for_each(|(by, band)| -> Result<(), CodecError> {
                    for bx in 0..width / BLOCK_SIZE {
                        write_block(band, width, bx, &f(&self.block(bx, by))?);
                    }
                    Ok(())
                })?;
        } else {
            for (bx, by) in block_coordinates(self.blocks_wide(), self.blocks_tall(), order) {
                out.set_block(bx, by, &f(&self.block(bx, by))?);
            }
        }
        Ok(out)
    }
}

impl Grid<f64> {
    /// Widens 8-bit samples into a real-valued grid.
    pub fn from_pixels(width: usize, height: usize, pixels: &[u8]) -> Result<Self, CodecError> {
        Self::new(width, height, pixels.iter().map(|&p| p as f64).collect())
    }

    /// Returns a copy with `offset` added to every sample.
    pub fn shifted(&self, offset: f64) -> Self {
        self.map(|v| v + offset)
    }

    /// Rounds and clamps every sample into `0..=255`.
    pub fn to_pixels(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| v.round().clamp(0.0, MAX_SAMPLE_VALUE) as u8)
            .collect()
    }

    pub fn mean_squared_error(&self, other: &Grid<f64>) -> Result<f64, CodecError> {
        self.check_same_shape(other)?;
        if self.data.is_empty() {
            return Ok(0.0);
        }
        let sum: f64 = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        Ok(sum / self.data.len() as f64)
    }

    /// Peak signal-to-noise ratio in dB for 8-bit imagery. Identical grids
    /// yield infinity.
    pub fn psnr(&self, other: &Grid<f64>) -> Result<f64, CodecError> {
        let mse = self.mean_squared_error(other)?;
        if mse == 0.0 {
            return Ok(f64::INFINITY);
        }
        Ok(10.0 * (MAX_SAMPLE_VALUE * MAX_SAMPLE_VALUE / mse).log10())
    }

    fn check_same_shape(&self, other: &Grid<f64>) -> Result<(), CodecError> {
        if self.width != other.width || self.height != other.height {
            return Err(CodecError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: other.width,
                actual_height: other.height,
            });
        }
        Ok(())
    }
}

fn cell_count(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height)
}

fn checked_cell_count(width: usize, height: usize) -> usize {
    match cell_count(width, height) {
        Some(count) => count,
        None => panic!("grid dimensions {}x{} overflow usize", width, height),
    }
}

fn write_block<T: Copy>(band: &mut [T], width: usize, bx: usize, block: &[T; BLOCK_DIM]) {
    for row in 0..BLOCK_SIZE {
        let start = row * width + bx * BLOCK_SIZE;
        band[start..start + BLOCK_SIZE]
            .copy_from_slice(&block[row * BLOCK_SIZE..(row + 1) * BLOCK_SIZE]);
    }
}

fn block_coordinates(blocks_wide: usize, blocks_tall: usize, order: ScanOrder) -> Vec<(usize, usize)> {
    match order {
        ScanOrder::RowMajor => (0..blocks_tall)
            .flat_map(|by| (0..blocks_wide).map(move |bx| (bx, by)))
            .collect(),
        ScanOrder::ColumnMajor => (0..blocks_wide)
            .flat_map(|bx| (0..blocks_tall).map(move |by| (bx, by)))
            .collect(),
    }
}
