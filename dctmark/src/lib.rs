//! Blind DCT-domain QIM image watermarking: block transform, embedder,
//! decoder, AWGN channel and the closed-form error model.
//!
//! This crate is the numerical core only. BMP container parsing lives
//! behind the [`bmp`] trait boundary and is implemented by a caller (the
//! `dctmark_cli` crate provides a concrete one); nothing here depends on a
//! specific container format.

pub mod bmp;
pub mod decode;
pub mod embed;
pub mod error;
pub mod image;
pub mod noise;
pub mod params;
pub mod tensor;
pub mod theory;
pub mod transform;

pub use decode::{decode_watermark, decode_watermark_blind};
pub use embed::embed_watermark;
pub use error::{Error, Result};
pub use image::{CoverImage, Mark};
pub use noise::NoiseChannel;
pub use params::{Parameters, SweepAxis, SweepConfig, ANTI_DIAGONAL_LEN};
pub use tensor::{BlockTensor, CoefTensor, SpatialTensor};
pub use theory::{q, theory_p_e};
pub use transform::{forward_dct_image, inverse_dct_image, spatial_tensor_to_pixels};
