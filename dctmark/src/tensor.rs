//! The block-major coefficient and spatial tensors `D` and `F` from the
//! data model: owned by the transform engine for the life of one
//! encode-or-decode pass, never process-wide globals.

use dctmark_transforms::{Block, ZERO_BLOCK};

use crate::error::{Error, Result};

/// Shared storage layout for `D` and `F`: `blocks_x * blocks_y` 8x8 tiles,
/// indexed in raster order (`bx + by * blocks_x`).
#[derive(Clone, Debug)]
pub struct BlockTensor {
    blocks_x: usize,
    blocks_y: usize,
    blocks: Vec<Block>,
}

impl BlockTensor {
    pub fn new(blocks_x: usize, blocks_y: usize) -> Self {
        Self {
            blocks_x,
            blocks_y,
            blocks: vec![ZERO_BLOCK; blocks_x * blocks_y],
        }
    }

    pub fn blocks_x(&self) -> usize {
        self.blocks_x
    }

    pub fn blocks_y(&self) -> usize {
        self.blocks_y
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Raster-order block index for block coordinates `(bx, by)`, per the
    /// spec's `bx + by * (W/8)` convention (not `pixel.size() / width`,
    /// which only agrees for square images).
    pub fn index_of(&self, bx: usize, by: usize) -> usize {
        bx + by * self.blocks_x
    }

    pub fn block(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    pub fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// The eight anti-diagonal coefficients `block[7-k][k]` for `k = 0..7`.
    pub fn anti_diagonal(&self, index: usize) -> [f64; 8] {
        let block = &self.blocks[index];
        std::array::from_fn(|k| block[7 - k][k])
    }

    /// Reads one anti-diagonal coefficient, `block[7-k][k]`.
    pub fn anti_diagonal_element(&self, index: usize, k: usize) -> f64 {
        self.blocks[index][7 - k][k]
    }

    /// Adds `delta` to one anti-diagonal coefficient, `block[7-k][k] += delta`.
    pub fn add_to_anti_diagonal_element(&mut self, index: usize, k: usize, delta: f64) {
        self.blocks[index][7 - k][k] += delta;
    }
}

/// DCT-domain coefficient tensor `D`.
pub type CoefTensor = BlockTensor;
/// Spatial-domain reconstruction tensor `F`, always clamped to `[0, 255]`.
pub type SpatialTensor = BlockTensor;

pub fn require_block_count(tensor: &BlockTensor, m: usize) -> Result<()> {
    if tensor.block_count() < m {
        return Err(Error::ParameterInfeasible(format!(
            "payload block count M={m} exceeds available blocks {}",
            tensor.block_count()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_index_matches_row_major_layout_even_for_non_square_images() {
        let tensor = BlockTensor::new(5, 3);
        assert_eq!(tensor.index_of(0, 0), 0);
        assert_eq!(tensor.index_of(4, 0), 4);
        assert_eq!(tensor.index_of(0, 1), 5);
        assert_eq!(tensor.index_of(2, 2), 12);
    }

    #[test]
    fn anti_diagonal_reads_the_eight_reverse_diagonal_coefficients() {
        let mut tensor = BlockTensor::new(1, 1);
        for (k, row) in tensor.block_mut(0).iter_mut().enumerate() {
            row[7 - k] = (k as f64) + 1.0;
        }
        let diag = tensor.anti_diagonal(0);
        assert_eq!(diag, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn add_to_anti_diagonal_element_mutates_only_that_coefficient() {
        let mut tensor = BlockTensor::new(1, 1);
        tensor.add_to_anti_diagonal_element(0, 3, 2.5);
        assert_eq!(tensor.anti_diagonal_element(0, 3), 2.5);
        assert_eq!(tensor.block(0)[4][3], 2.5);
        for (r, row) in tensor.block(0).iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if (r, c) != (4, 3) {
                    assert_eq!(v, 0.0);
                }
            }
        }
    }

    #[test]
    fn require_block_count_rejects_oversized_m() {
        let tensor = BlockTensor::new(2, 2);
        assert!(require_block_count(&tensor, 4).is_ok());
        assert!(require_block_count(&tensor, 5).is_err());
    }
}
