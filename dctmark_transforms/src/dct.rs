use std::f64::consts::{FRAC_1_SQRT_2, PI, SQRT_2};

/// Side length of a transform block. The anti-diagonal QIM scheme this crate
/// supports is defined only for 8x8 blocks; there is no generic N here.
pub const BLOCK: usize = 8;

/// An 8x8 tensor of transform-domain or spatial-domain values, row-major
/// (`block[row][col]`).
pub type Block = [[f64; BLOCK]; BLOCK];

pub const ZERO_BLOCK: Block = [[0.0; BLOCK]; BLOCK];

/// Forward-transform normalization: `1/sqrt(2)` at DC, `1` elsewhere.
#[inline]
fn forward_scale(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// Inverse-transform normalization: `1` at DC, `sqrt(2)` elsewhere.
#[inline]
fn inverse_scale(u: usize) -> f64 {
    if u == 0 { 1.0 } else { SQRT_2 }
}

/// Computes the forward 8x8 DCT-II of `pixels` directly from the defining
/// double sum (no fast recursive factorization). `pixels[y][x]` holds the
/// intensity at row `y`, column `x` within the block.
///
/// This is the textbook formula, not an FFT-derived fast transform: the
/// embedder and decoder need bit-for-bit reproducible coefficients more than
/// they need throughput on a single 8x8 tile.
pub fn forward_block_dct(pixels: &Block) -> Block {
    let mut coeffs = ZERO_BLOCK;
    let w = BLOCK as f64;
    for i in 0..BLOCK {
        for j in 0..BLOCK {
            let mut sum = 0.0;
            for y in 0..BLOCK {
                for x in 0..BLOCK {
                    sum += pixels[y][x]
                        * ((2 * x + 1) as f64 * i as f64 * PI / (2.0 * w)).cos()
                        * ((2 * y + 1) as f64 * j as f64 * PI / (2.0 * w)).cos();
                }
            }
            coeffs[i][j] = (1.0 / (2.0 * w).sqrt()) * forward_scale(i) * forward_scale(j) * sum;
        }
    }
    coeffs
}

/// Computes the inverse 8x8 DCT-III of `coeffs`, clamping every output
/// sample to `[0, 255]` as the spec requires of the reconstructed pixel
/// domain.
///
/// `pixels[y][x]` is produced from `coeffs[u][v]` pairing `u` with `x` and
/// `v` with `y`, mirroring the pairing [`forward_block_dct`] uses when it
/// builds `coeffs[i][j]` from `pixels[y][x]` — `x` with `i`, `y` with `j`.
/// Pairing the output indices the other way round reconstructs the
/// transpose of the original block instead of the block itself.
pub fn inverse_block_dct(coeffs: &Block) -> Block {
    let mut pixels = ZERO_BLOCK;
    let w = BLOCK as f64;
    for y in 0..BLOCK {
        for x in 0..BLOCK {
            let mut sum = 0.0;
            for u in 0..BLOCK {
                for v in 0..BLOCK {
                    sum += inverse_scale(u)
                        * inverse_scale(v)
                        * coeffs[u][v]
                        * ((x as f64 + 0.5) * u as f64 * PI / w).cos()
                        * ((y as f64 + 0.5) * v as f64 * PI / w).cos();
                }
            }
            pixels[y][x] = (sum / w).clamp(0.0, 255.0);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use dctmark_test_utils::assert_all_almost_eq;

    fn flatten(b: &Block) -> Vec<f64> {
        b.iter().flatten().copied().collect()
    }

    #[test]
    fn constant_block_has_only_dc_energy() {
        let pixels = [[128.0; BLOCK]; BLOCK];
        let coeffs = forward_block_dct(&pixels);
        assert_all_almost_eq!([coeffs[0][0]].as_slice(), [1024.0].as_slice(), 1e-9);
        let mut rest = flatten(&coeffs);
        rest[0] = 0.0;
        assert_all_almost_eq!(rest.as_slice(), vec![0.0; 64].as_slice(), 1e-9);
    }

    #[test]
    fn round_trip_preserves_constant_image() {
        let pixels = [[200.0; BLOCK]; BLOCK];
        let coeffs = forward_block_dct(&pixels);
        let back = inverse_block_dct(&coeffs);
        assert_all_almost_eq!(flatten(&back).as_slice(), flatten(&pixels).as_slice(), 1e-7);
    }

    #[test]
    fn round_trip_preserves_arbitrary_block_within_a_gray_level() {
        let mut pixels = ZERO_BLOCK;
        for (y, row) in pixels.iter_mut().enumerate() {
            for (x, p) in row.iter_mut().enumerate() {
                *p = ((y * 37 + x * 11) % 256) as f64;
            }
        }
        let coeffs = forward_block_dct(&pixels);
        let back = inverse_block_dct(&coeffs);
        for (a, b) in flatten(&back).iter().zip(flatten(&pixels).iter()) {
            assert!((a - b).abs() <= 1.0, "pixel drifted by more than 1 gray level: {a} vs {b}");
        }
    }

    #[test]
    fn round_trip_does_not_transpose_an_asymmetric_block() {
        // A block with no row/column symmetry: if the inverse transform
        // pairs its output indices to the wrong frequency axis, this comes
        // back as the transpose of `pixels` rather than `pixels` itself,
        // while every symmetric fixture above would still pass.
        let mut pixels = ZERO_BLOCK;
        for (y, row) in pixels.iter_mut().enumerate() {
            for (x, p) in row.iter_mut().enumerate() {
                *p = (y * 20 + x * 3) as f64;
            }
        }
        let coeffs = forward_block_dct(&pixels);
        let back = inverse_block_dct(&coeffs);
        assert_all_almost_eq!(flatten(&back).as_slice(), flatten(&pixels).as_slice(), 1e-7);
    }

    #[test]
    fn clamps_out_of_range_reconstruction() {
        // A coefficient set that reconstructs far outside [0, 255] at DC.
        let mut coeffs = ZERO_BLOCK;
        coeffs[0][0] = 1.0e6;
        let back = inverse_block_dct(&coeffs);
        for row in back.iter() {
            for &v in row.iter() {
                assert!((0.0..=255.0).contains(&v));
            }
        }
    }
}
