//! The additive-white-Gaussian-noise channel (SPEC_FULL.md 4.6): a
//! Box-Muller transform over a seedable PRNG, rather than the reference's
//! wall-clock-seeded global generator (SPEC_FULL.md Design Notes / 9).

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::instrument;

use crate::tensor::SpatialTensor;

/// A seedable Gaussian noise source. Two independently constructed
/// instances with the same seed draw identical sequences, which is what
/// makes the monotonicity and theoretical-bound properties in
/// SPEC_FULL.md 8 testable.
pub struct NoiseChannel {
    rng: StdRng,
}

impl NoiseChannel {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Draws one `N(0, 1)` sample via the Box-Muller transform, matching
    /// the reference's `sqrt(-2 ln(1 - u1)) * sin(2*pi*u2)` form exactly
    /// (rather than the more common `cos` variant) so a fixed seed
    /// reproduces the same sequence.
    fn standard_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.random();
        let u2: f64 = self.rng.random();
        (-2.0 * (1.0 - u1).ln()).sqrt() * (2.0 * PI * u2).sin()
    }

    /// Adds `N(0, sigma^2)` noise to every sample of `tensor`, in raster
    /// block order and row-major within each block, so draws are never
    /// reordered against a seeded reference.
    #[instrument(skip(self, tensor), fields(sigma))]
    pub fn apply(&mut self, tensor: &mut SpatialTensor, sigma: f64) {
        if sigma == 0.0 {
            return;
        }
        for block in tensor.blocks_mut() {
            for row in block.iter_mut() {
                for sample in row.iter_mut() {
                    *sample += self.standard_normal() * sigma;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sigma_leaves_tensor_untouched() {
        let mut tensor = SpatialTensor::new(1, 1);
        tensor.block_mut(0)[0][0] = 128.0;
        let mut channel = NoiseChannel::from_seed(42);
        channel.apply(&mut tensor, 0.0);
        assert_eq!(tensor.block(0)[0][0], 128.0);
    }

    #[test]
    fn same_seed_reproduces_the_same_noise_sequence() {
        let mut a = SpatialTensor::new(2, 2);
        let mut b = SpatialTensor::new(2, 2);
        NoiseChannel::from_seed(7).apply(&mut a, 2.0);
        NoiseChannel::from_seed(7).apply(&mut b, 2.0);
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SpatialTensor::new(2, 2);
        let mut b = SpatialTensor::new(2, 2);
        NoiseChannel::from_seed(1).apply(&mut a, 2.0);
        NoiseChannel::from_seed(2).apply(&mut b, 2.0);
        assert_ne!(a.blocks(), b.blocks());
    }

    #[test]
    fn larger_sigma_produces_larger_typical_magnitude() {
        let mut low = SpatialTensor::new(4, 4);
        let mut high = SpatialTensor::new(4, 4);
        NoiseChannel::from_seed(99).apply(&mut low, 0.5);
        NoiseChannel::from_seed(99).apply(&mut high, 5.0);
        let sum_abs = |t: &SpatialTensor| -> f64 {
            t.blocks().iter().flatten().flatten().map(|v| v.abs()).sum()
        };
        assert!(sum_abs(&high) > sum_abs(&low));
    }
}
