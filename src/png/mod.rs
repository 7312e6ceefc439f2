//! PNG decoder and RGBA encoder (internal).
//!
//! Decoding accepts every PNG colour type and bit depth; output is always
//! 8-bit RGBA with alpha 0 or 255.

mod decode;
mod encode;
mod unpack;

use std::io::Write;

use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelCanvas;

pub(crate) use decode::{SIGNATURE, parse_png_header};
pub use encode::PngCompression;

/// Decode PNG data to a canvas.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelCanvas, BitmapError> {
    decode::decode_png_pixels(data, limits)
}

/// Encode a canvas as PNG into `w`.
pub(crate) fn encode<W: Write>(
    canvas: &PixelCanvas,
    w: W,
    compression: PngCompression,
) -> Result<(), BitmapError> {
    encode::encode_png(canvas, w, compression)
}
