//! The QIM embedder (SPEC_FULL.md 4.4): spreads each mark bit across `N`
//! anti-diagonal coefficients by nudging them onto one of two interleaved
//! quantization lattices.

use tracing::{instrument, trace};

use crate::error::Result;
use crate::image::Mark;
use crate::params::{Parameters, ANTI_DIAGONAL_LEN};
use crate::tensor::{require_block_count, CoefTensor};

/// `W(n) = +1` if `n` is odd, `-1` if even.
#[inline]
pub fn antipodal_sign(n: usize) -> f64 {
    if n % 2 == 1 { 1.0 } else { -1.0 }
}

/// `Q_delta(x) = delta * round(x / delta)`, the unbiased quantization lattice.
#[inline]
pub fn quantize_delta(x: f64, delta: f64) -> f64 {
    delta * (x / delta).round()
}

/// `Q_b(x)`, the lattice dithered by `+delta/4` (bit 1) or `-delta/4` (bit 0).
#[inline]
pub fn quantize_bit(x: f64, bit: u8, delta: f64) -> f64 {
    let dither = if bit == 1 { delta / 4.0 } else { -delta / 4.0 };
    quantize_delta(x - dither, delta) + dither
}

/// The per-block projection statistic, `x_projection[m]` from SPEC_FULL.md
/// 4.4: a signed average of the block's eight anti-diagonal coefficients.
#[inline]
pub fn block_projection(tensor: &CoefTensor, block: usize, n: usize) -> f64 {
    let mut sum = 0.0;
    for k in 0..ANTI_DIAGONAL_LEN {
        sum += tensor.anti_diagonal_element(block, k) * antipodal_sign(k);
    }
    sum / n as f64
}

/// Maps a flat stream position (`0..M*K`) to the `(block, intra_block_k)`
/// pair it addresses. The stream is block-major: `8*m + k` points at
/// `D[m][7-k][k]`.
#[inline]
fn stream_position_to_block_k(position: usize) -> (usize, usize) {
    (position / ANTI_DIAGONAL_LEN, position % ANTI_DIAGONAL_LEN)
}

/// Embeds `mark` into `tensor` in place, per `params`. `tensor` must already
/// hold the forward DCT of the cover image.
#[instrument(skip(tensor, mark), fields(m = params.m(), delta = params.delta(), n = params.n()))]
pub fn embed_watermark(tensor: &mut CoefTensor, mark: &Mark, params: &Parameters) -> Result<()> {
    require_block_count(tensor, params.m())?;
    let m = params.m();
    let n = params.n();
    let delta = params.delta();

    let projections: Vec<f64> = (0..m).map(|block| block_projection(tensor, block, n)).collect();

    for (i, bit) in mark.bits().enumerate() {
        for j in 0..n {
            let stream_position = i * n + j;
            let (block, k) = stream_position_to_block_k(stream_position);
            let x = projections[block];
            let quantized = quantize_bit(x, bit, delta);
            let delta_coef = (quantized - x) * antipodal_sign(j);
            tensor.add_to_anti_diagonal_element(block, k, delta_coef);
        }
    }
    trace!("embedding complete");
    Ok(())
}
