//! BMP container support for the `dctmark` CLI: a concrete
//! [`dctmark::bmp::BitmapReader`]/[`dctmark::bmp::BitmapWriter`] pair.

pub mod bmp;
