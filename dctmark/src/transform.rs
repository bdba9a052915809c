//! Wires the per-block primitives in `dctmark_transforms` into the
//! whole-image tensors `D` and `F`. Every block is transformed, not only the
//! payload blocks, because decoding is blind and re-transforms the whole
//! image (SPEC_FULL.md 4.2).

use dctmark_transforms::{forward_block_dct, inverse_block_dct, Block};
use tracing::{debug, instrument};

use crate::image::CoverImage;
use crate::tensor::{CoefTensor, SpatialTensor};

/// Runs the forward 8x8 block DCT over every block of `cover`, in raster
/// order `bx + by * blocks_x`.
#[instrument(skip(cover), fields(width = cover.width(), height = cover.height()))]
pub fn forward_dct_image(cover: &CoverImage) -> CoefTensor {
    let blocks_x = cover.blocks_x();
    let blocks_y = cover.blocks_y();
    let mut tensor = CoefTensor::new(blocks_x, blocks_y);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut pixels: Block = [[0.0; 8]; 8];
            for (y, row) in pixels.iter_mut().enumerate() {
                for (x, p) in row.iter_mut().enumerate() {
                    // Safe to unwrap: bx, by range within blocks_x/blocks_y by construction.
                    *p = cover.pixel(bx * 8 + x, by * 8 + y).unwrap() as f64;
                }
            }
            let index = tensor.index_of(bx, by);
            *tensor.block_mut(index) = forward_block_dct(&pixels);
        }
    }
    debug!(blocks = tensor.block_count(), "forward DCT complete");
    tensor
}

/// Runs the inverse 8x8 block DCT over every block of `coeffs`, clamping
/// every reconstructed sample to `[0, 255]`.
#[instrument(skip(coeffs))]
pub fn inverse_dct_image(coeffs: &CoefTensor) -> SpatialTensor {
    let mut out = SpatialTensor::new(coeffs.blocks_x(), coeffs.blocks_y());
    for (index, block) in coeffs.blocks().iter().enumerate() {
        *out.block_mut(index) = inverse_block_dct(block);
    }
    debug!(blocks = out.block_count(), "inverse DCT complete");
    out
}

/// Serializes a spatial tensor to a flat `width x height` grayscale pixel
/// buffer. `inverse_block_dct` already produces each block indexed
/// `[row % 8][col % 8]` (SPEC_FULL.md 4.3 and Design Notes permit
/// normalizing the reference's forward/inverse axis pairing instead of
/// reproducing its transpose-and-compensate quirk; see DESIGN.md), so the
/// pixel at image row `i`, column `j` is read straight from
/// `F[block][i % 8][j % 8]`.
pub fn spatial_tensor_to_pixels(tensor: &SpatialTensor, width: usize, height: usize) -> Vec<u8> {
    let blocks_x = tensor.blocks_x();
    let mut pixels = vec![0u8; width * height];
    for i in 0..height {
        for j in 0..width {
            let index = (i / 8) * blocks_x + j / 8;
            let value = tensor.block(index)[i % 8][j % 8];
            pixels[i * width + j] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use dctmark_test_utils::assert_all_almost_eq;

    fn solid_cover(value: u8, side: usize) -> CoverImage {
        CoverImage::new(side, side, vec![value; side * side]).unwrap()
    }

    #[test]
    fn forward_dct_of_constant_image_concentrates_energy_at_dc() {
        let cover = solid_cover(128, 16);
        let coeffs = forward_dct_image(&cover);
        for block in coeffs.blocks() {
            assert_all_almost_eq!([block[0][0]].as_slice(), [1024.0].as_slice(), 1e-9);
            let rest: Vec<f64> = block
                .iter()
                .enumerate()
                .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| (r, c, v)))
                .filter(|&(r, c, _)| (r, c) != (0, 0))
                .map(|(_, _, v)| v)
                .collect();
            assert_all_almost_eq!(rest.as_slice(), vec![0.0; 63].as_slice(), 1e-9);
        }
    }

    #[test]
    fn round_trip_reproduces_cover_within_one_gray_level() {
        let mut pixels = vec![0u8; 64 * 64];
        for (i, p) in pixels.iter_mut().enumerate() {
            *p = ((i * 7) % 256) as u8;
        }
        let cover = CoverImage::new(64, 64, pixels.clone()).unwrap();
        let coeffs = forward_dct_image(&cover);
        let spatial = inverse_dct_image(&coeffs);
        let out = spatial_tensor_to_pixels(&spatial, 64, 64);
        for (a, b) in out.iter().zip(pixels.iter()) {
            assert!(
                (*a as i32 - *b as i32).abs() <= 1,
                "pixel drifted by more than one gray level: {a} vs {b}"
            );
        }
    }

    #[test]
    fn serialization_reads_row_major_without_transposing() {
        let mut tensor = SpatialTensor::new(1, 1);
        tensor.block_mut(0)[3][5] = 42.0;
        let pixels = spatial_tensor_to_pixels(&tensor, 8, 8);
        // row 3, col 5 reads block[3][5] directly.
        assert_eq!(pixels[3 * 8 + 5], 42);
    }
}
