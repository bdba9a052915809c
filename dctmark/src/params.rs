//! Experiment configuration: the `(M, Delta, sigma, N)` quadruple from the
//! data model, plus the sweep-over-`(Delta, sigma)` that the reference tool
//! hard-coded to a single point (see SPEC_FULL.md, Design Notes).

use crate::error::{Error, Result};

/// Length of the anti-diagonal, `K = 8` in the spec.
pub const ANTI_DIAGONAL_LEN: usize = 8;

/// One feasible `(M, Delta, sigma, N)` configuration for an encode/decode pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    /// Number of payload blocks, `M`.
    m: usize,
    /// Quantization step, `Delta`.
    delta: f64,
    /// Noise standard deviation, `sigma`. Zero is a valid, noiseless channel.
    sigma: f64,
    /// Repetition factor, `N = M * K / L`.
    n: usize,
}

impl Parameters {
    /// Validates and builds a `Parameters` set for a mark with `mark_len =
    /// Hm * Wm` bits. Rejects any configuration the spec calls
    /// `ParameterInfeasible`: a non-positive `Delta`, an `M*K` not a
    /// multiple of `L`, or a resulting `N < 1`.
    pub fn new(m: usize, delta: f64, sigma: f64, mark_len: usize) -> Result<Self> {
        if !(delta > 0.0) || !delta.is_finite() {
            return Err(Error::ParameterInfeasible(format!(
                "delta must be a positive finite value, got {delta}"
            )));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(Error::ParameterInfeasible(format!(
                "sigma must be a non-negative finite value, got {sigma}"
            )));
        }
        if mark_len == 0 {
            return Err(Error::ParameterInfeasible(
                "mark must have at least one bit".into(),
            ));
        }
        let total_coeffs = m
            .checked_mul(ANTI_DIAGONAL_LEN)
            .ok_or_else(|| Error::ParameterInfeasible("M * K overflowed".into()))?;
        if total_coeffs % mark_len != 0 {
            return Err(Error::ParameterInfeasible(format!(
                "M*K={total_coeffs} is not a multiple of mark length L={mark_len}"
            )));
        }
        let n = total_coeffs / mark_len;
        if n < 1 {
            return Err(Error::ParameterInfeasible(format!(
                "repetition factor N={n} must be at least 1"
            )));
        }
        Ok(Self {
            m,
            delta,
            sigma,
            n,
        })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn with_sigma(&self, sigma: f64) -> Result<Self> {
        Self::new(self.m, self.delta, sigma, self.total_coeffs() / self.n)
    }

    pub fn with_delta(&self, delta: f64) -> Result<Self> {
        Self::new(self.m, delta, self.sigma, self.total_coeffs() / self.n)
    }

    fn total_coeffs(&self) -> usize {
        self.m * ANTI_DIAGONAL_LEN
    }
}

/// One axis of a parameter sweep: `start..=end` stepped by `step`. An
/// operational equivalent of the disabled sweep loop in the reference
/// `main`, made first-class (SPEC_FULL.md, Design Notes).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepAxis {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl SweepAxis {
    pub fn fixed(value: f64) -> Self {
        Self {
            start: value,
            end: value,
            step: 1.0,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.start > self.end {
            return vec![self.start];
        }
        let mut values = Vec::new();
        let mut v = self.start;
        // Small epsilon guards against float drift dropping the last point.
        while v <= self.end + self.step * 1e-9 {
            values.push(v);
            v += self.step;
        }
        if values.is_empty() {
            values.push(self.start);
        }
        values
    }
}

/// A `(Delta, sigma)` sweep configuration, crossed as a full grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepConfig {
    pub delta: SweepAxis,
    pub sigma: SweepAxis,
}

impl SweepConfig {
    pub fn single_point(delta: f64, sigma: f64) -> Self {
        Self {
            delta: SweepAxis::fixed(delta),
            sigma: SweepAxis::fixed(sigma),
        }
    }

    /// All `(Delta, sigma)` cells in the grid, delta-major like the
    /// reference's nested loop order.
    pub fn cells(&self) -> Vec<(f64, f64)> {
        let deltas = self.delta.values();
        let sigmas = self.sigma.values();
        let mut cells = Vec::with_capacity(deltas.len() * sigmas.len());
        for &d in &deltas {
            for &s in &sigmas {
                cells.push((d, s));
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_configuration_derives_n_eight() {
        let p = Parameters::new(4096, 4.0, 1.5, 64 * 64).unwrap();
        assert_eq!(p.n(), 8);
    }

    #[test]
    fn rejects_non_divisible_mark_length() {
        let err = Parameters::new(10, 4.0, 0.0, 3).unwrap_err();
        assert!(matches!(err, Error::ParameterInfeasible(_)));
    }

    #[test]
    fn rejects_non_positive_delta() {
        assert!(Parameters::new(8, 0.0, 0.0, 1).is_err());
        assert!(Parameters::new(8, -1.0, 0.0, 1).is_err());
    }

    #[test]
    fn rejects_negative_sigma() {
        assert!(Parameters::new(8, 4.0, -0.1, 1).is_err());
    }

    #[test]
    fn single_point_sweep_has_exactly_one_cell() {
        let sweep = SweepConfig::single_point(4.0, 1.5);
        assert_eq!(sweep.cells(), vec![(4.0, 1.5)]);
    }

    #[test]
    fn sweep_grid_is_delta_major_cross_product() {
        let sweep = SweepConfig {
            delta: SweepAxis { start: 1.0, end: 2.0, step: 1.0 },
            sigma: SweepAxis { start: 0.0, end: 1.0, step: 0.5 },
        };
        assert_eq!(
            sweep.cells(),
            vec![(1.0, 0.0), (1.0, 0.5), (1.0, 1.0), (2.0, 0.0), (2.0, 0.5), (2.0, 1.0)]
        );
    }
}
