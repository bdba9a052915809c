//! A concrete [`BitmapReader`]/[`BitmapWriter`] pair for the two BMP
//! variants the core consumes (SPEC_FULL.md 6.1-6.3): 8-bit indexed
//! grayscale covers and 1-bit bi-level marks. This is the external
//! collaborator the core traits describe; the core never parses these
//! bytes itself.

use std::fs;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use dctmark::bmp::{BitmapReader, BitmapWriter};
use dctmark::error::{Error, Result};
use dctmark::{CoverImage, Mark};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;

struct Header {
    width: i32,
    height: i32,
    bit_count: u16,
    off_bits: u32,
    prefix: Vec<u8>,
}

fn parse_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < FILE_HEADER_LEN + INFO_HEADER_LEN {
        return Err(Error::InputUnavailable("BMP shorter than its own header".into()));
    }
    if &bytes[0..2] != b"BM" {
        return Err(Error::UnsupportedFormat("missing 'BM' signature".into()));
    }
    let mut file_header = &bytes[10..14];
    let off_bits = file_header.read_u32::<LittleEndian>()?;

    let mut info = &bytes[FILE_HEADER_LEN + 4..FILE_HEADER_LEN + 12];
    let width = info.read_i32::<LittleEndian>()?;
    let height = info.read_i32::<LittleEndian>()?;
    let mut bit_count_bytes = &bytes[FILE_HEADER_LEN + 14..FILE_HEADER_LEN + 16];
    let bit_count = bit_count_bytes.read_u16::<LittleEndian>()?;

    if (off_bits as usize) > bytes.len() {
        return Err(Error::InputUnavailable("bfOffBits past end of file".into()));
    }
    Ok(Header {
        width,
        height,
        bit_count,
        off_bits,
        prefix: bytes[..off_bits as usize].to_vec(),
    })
}

fn row_stride(width_bytes: usize) -> usize {
    width_bytes.div_ceil(4) * 4
}

/// Reads an 8-bit indexed grayscale cover, honoring bottom-up row order
/// and 4-byte row padding (SPEC_FULL.md 6.1).
fn read_cover_bmp(path: &Path) -> Result<CoverImage> {
    let bytes = fs::read(path).map_err(|e| Error::InputUnavailable(format!("{}: {e}", path.display())))?;
    let header = parse_header(&bytes)?;
    if header.bit_count != 8 {
        return Err(Error::UnsupportedFormat(format!(
            "cover must be 8-bit indexed, got {}-bit",
            header.bit_count
        )));
    }
    let width = header.width as usize;
    let height = header.height.unsigned_abs() as usize;
    if width % 8 != 0 || height % 8 != 0 {
        return Err(Error::UnsupportedFormat(format!(
            "cover dimensions {width}x{height} must be multiples of 8"
        )));
    }
    let stride = row_stride(width);
    let pixel_area = &bytes[header.off_bits as usize..];

    let mut pixels = vec![0u8; width * height];
    for row in 0..height {
        let src_row = &pixel_area[row * stride..row * stride + width];
        let dest_row = height - 1 - row;
        pixels[dest_row * width..dest_row * width + width].copy_from_slice(src_row);
    }
    CoverImage::new(width, height, pixels)
}

/// Reads a 1-bit bi-level mark, unpacking MSB-first rows into antipodal
/// `{-1, +1}` symbols (SPEC_FULL.md 6.2).
fn read_mark_bmp(path: &Path) -> Result<Mark> {
    let bytes = fs::read(path).map_err(|e| Error::InputUnavailable(format!("{}: {e}", path.display())))?;
    let header = parse_header(&bytes)?;
    if header.bit_count != 1 {
        return Err(Error::UnsupportedFormat(format!(
            "mark must be 1-bit bi-level, got {}-bit",
            header.bit_count
        )));
    }
    let width = header.width as usize;
    let height = header.height.unsigned_abs() as usize;
    let packed_width = width.div_ceil(8);
    let stride = row_stride(packed_width);
    let pixel_area = &bytes[header.off_bits as usize..];

    let mut symbols = vec![0i8; width * height];
    for row in 0..height {
        let src_row = &pixel_area[row * stride..row * stride + packed_width];
        let dest_row = height - 1 - row;
        for col in 0..width {
            let byte = src_row[col / 8];
            let bit = (byte >> (7 - col % 8)) & 1;
            symbols[dest_row * width + col] = if bit == 1 { 1 } else { -1 };
        }
    }
    Mark::from_symbols(width, height, symbols)
}

/// Reads cover and mark BMPs from fixed paths on disk.
pub struct FileBitmapReader {
    pub cover_path: PathBuf,
    pub mark_path: PathBuf,
}

impl BitmapReader for FileBitmapReader {
    fn read_cover(&self) -> Result<CoverImage> {
        read_cover_bmp(&self.cover_path)
    }

    fn read_mark(&self) -> Result<Mark> {
        read_mark_bmp(&self.mark_path)
    }
}

/// Writes a watermarked 8-bit indexed grayscale BMP, copying the cover's
/// header block through `bfOffBits` byte-for-byte and overwriting only the
/// pixel area (SPEC_FULL.md 6.3).
pub struct FileBitmapWriter {
    pub cover_path: PathBuf,
    pub output_path: PathBuf,
}

impl BitmapWriter for FileBitmapWriter {
    fn write_cover(&self, width: usize, height: usize, pixels: &[u8]) -> Result<()> {
        let cover_bytes = fs::read(&self.cover_path)
            .map_err(|e| Error::InputUnavailable(format!("{}: {e}", self.cover_path.display())))?;
        let header = parse_header(&cover_bytes)?;

        let stride = row_stride(width);
        let mut out = header.prefix.clone();
        out.resize(header.off_bits as usize + stride * height, 0);

        for row in 0..height {
            // Output row index i = 0 is the bottom row; src_row is the
            // matching top-down pixel buffer row.
            let src_row = height - 1 - row;
            let dest_start = header.off_bits as usize + row * stride;
            out[dest_start..dest_start + width].copy_from_slice(&pixels[src_row * width..src_row * width + width]);
        }

        use std::io::Write;
        let mut file = fs::File::create(&self.output_path)?;
        file.write_all(&out)?;
        Ok(())
    }
}
