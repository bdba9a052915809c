use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use dctmark::bmp::{BitmapReader, BitmapWriter};
use dctmark::{
    decode_watermark, decode_watermark_blind, embed_watermark, forward_dct_image, inverse_dct_image,
    spatial_tensor_to_pixels, theory_p_e, CoverImage, NoiseChannel, Parameters, SweepAxis, SweepConfig,
};

use dctmark_cli::bmp::{FileBitmapReader, FileBitmapWriter};

/// Blind DCT-domain QIM image watermarking: embed, add AWGN, decode, and
/// report empirical vs. theoretical bit-error rate over a (delta, sigma) sweep.
#[derive(Parser)]
#[command(version)]
struct Opt {
    /// 8-bit indexed grayscale cover BMP.
    cover: PathBuf,

    /// 1-bit bi-level mark BMP.
    mark: PathBuf,

    /// Watermarked output BMP, written once per run using the last swept cell.
    output: PathBuf,

    /// Quantization step, start of the sweep.
    #[clap(long, default_value_t = 4.0)]
    delta: f64,

    /// Quantization step, end of the sweep (inclusive). Defaults to `--delta` (no sweep).
    #[clap(long)]
    delta_end: Option<f64>,

    /// Quantization step increment.
    #[clap(long, default_value_t = 1.0)]
    delta_step: f64,

    /// Noise standard deviation, start of the sweep.
    #[clap(long, default_value_t = 1.5)]
    sigma: f64,

    /// Noise standard deviation, end of the sweep (inclusive). Defaults to `--sigma` (no sweep).
    #[clap(long)]
    sigma_end: Option<f64>,

    /// Noise standard deviation increment.
    #[clap(long, default_value_t = 0.5)]
    sigma_step: f64,

    /// PRNG seed for the noise channel. Without this, a fresh seed is drawn
    /// from OS entropy on every run.
    #[clap(long)]
    seed: Option<u64>,

    /// Also run the standalone blind decoder (no access to the original
    /// mark) and log its agreement with the embedded mark.
    #[clap(long)]
    blind: bool,

    /// Path for the empirical bit-error-rate result stream.
    #[clap(long, default_value = "result1.txt")]
    result1: PathBuf,

    /// Path for the theoretical error-probability result stream.
    #[clap(long, default_value = "result2.txt")]
    result2: PathBuf,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opt = Opt::parse();

    let reader = FileBitmapReader {
        cover_path: opt.cover.clone(),
        mark_path: opt.mark.clone(),
    };
    let cover = reader
        .read_cover()
        .wrap_err_with(|| format!("failed to read cover BMP {:?}", opt.cover))?;
    let mark = reader
        .read_mark()
        .wrap_err_with(|| format!("failed to read mark BMP {:?}", opt.mark))?;

    info!(
        width = cover.width(),
        height = cover.height(),
        mark_bits = mark.len(),
        "loaded cover and mark"
    );

    let base_coeffs = forward_dct_image(&cover);
    let m = cover.block_count();

    let sweep = SweepConfig {
        delta: SweepAxis {
            start: opt.delta,
            end: opt.delta_end.unwrap_or(opt.delta),
            step: opt.delta_step,
        },
        sigma: SweepAxis {
            start: opt.sigma,
            end: opt.sigma_end.unwrap_or(opt.sigma),
            step: opt.sigma_step,
        },
    };

    let mut result1_lines = Vec::new();
    let mut result2_lines = Vec::new();
    let mut last_pixels: Option<(usize, usize, Vec<u8>)> = None;

    for (delta, sigma) in sweep.cells() {
        let params = Parameters::new(m, delta, sigma, mark.len())
            .wrap_err_with(|| format!("infeasible parameters at delta={delta}, sigma={sigma}"))?;

        let mut coeffs = base_coeffs.clone();
        embed_watermark(&mut coeffs, &mark, &params)?;

        let mut spatial = inverse_dct_image(&coeffs);
        let mut noise = match opt.seed {
            Some(seed) => NoiseChannel::from_seed(seed),
            None => NoiseChannel::from_entropy(),
        };
        noise.apply(&mut spatial, sigma);

        let pixels = spatial_tensor_to_pixels(&spatial, cover.width(), cover.height());

        // Blind decoding re-transforms the noisy image from scratch, as a
        // receiver with no access to the pre-noise coefficients would.
        let noisy_cover = CoverImage::new(cover.width(), cover.height(), pixels.clone())?;
        let noisy_coeffs = forward_dct_image(&noisy_cover);

        let ber = decode_watermark(&noisy_coeffs, &mark, &params)?;
        let p_e = theory_p_e(sigma, delta);

        if opt.blind {
            let decoded = decode_watermark_blind(&noisy_coeffs, &params, mark.len())?;
            let expected: Vec<u8> = mark.bits().collect();
            let agreement = decoded.iter().zip(expected.iter()).filter(|(a, b)| a == b).count();
            info!(
                delta,
                sigma,
                agreement_fraction = agreement as f64 / mark.len() as f64,
                "blind decode agreement"
            );
        }

        info!(delta, sigma, bit_error_rate = ber, theoretical_p_e = p_e, "swept cell complete");
        result1_lines.push(format!("{delta:.6} {ber:.6}"));
        result2_lines.push(format!("{delta:.6} {p_e:.6}"));
        last_pixels = Some((cover.width(), cover.height(), pixels));
    }

    if let Some((width, height, pixels)) = last_pixels {
        let writer = FileBitmapWriter {
            cover_path: opt.cover.clone(),
            output_path: opt.output.clone(),
        };
        writer
            .write_cover(width, height, &pixels)
            .wrap_err_with(|| format!("failed to write watermarked BMP {:?}", opt.output))?;
    }

    fs::write(&opt.result1, result1_lines.join("\n") + "\n")
        .wrap_err_with(|| format!("failed to write {:?}", opt.result1))?;
    fs::write(&opt.result2, result2_lines.join("\n") + "\n")
        .wrap_err_with(|| format!("failed to write {:?}", opt.result2))?;

    Ok(())
}
