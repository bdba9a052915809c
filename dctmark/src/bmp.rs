//! Collaborator traits for BMP container I/O (SPEC_FULL.md 6.1-6.3). The
//! core never parses a BMP file itself; it consumes a decoded pixel matrix
//! and bit-matrix from a [`BitmapReader`] and hands a finished pixel buffer
//! to a [`BitmapWriter`] that preserves the cover's header verbatim.
//!
//! A concrete implementation lives in the CLI crate, since container
//! parsing is an external collaborator per the data model, not core logic.

use crate::error::Result;
use crate::image::{CoverImage, Mark};

/// Decodes a cover or mark BMP into the core's in-memory types.
pub trait BitmapReader {
    fn read_cover(&self) -> Result<CoverImage>;
    fn read_mark(&self) -> Result<Mark>;
}

/// Writes a watermarked grayscale pixel buffer to a BMP, copying the
/// cover's header block (file header, info header, palette) through
/// `bfOffBits` byte-for-byte and overwriting only the pixel area.
pub trait BitmapWriter {
    fn write_cover(&self, width: usize, height: usize, pixels: &[u8]) -> Result<()>;
}

/// An opaque sink for preview pixels. Referenced only as a collaborator
/// seam; it plays no role in the core's correctness and has no default
/// implementation here.
pub trait Canvas {
    fn present(&self, width: usize, height: usize, pixels: &[u8]);
}
