//! 8-bit paletted BMP decoder (internal).
//!
//! Only the uncompressed, single-plane, 8 bits-per-pixel subtype is accepted.
//! Palette index 0 is the colorkey.

mod decode;

use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelCanvas;

pub use decode::BmpRowLayout;
pub(crate) use decode::parse_bmp_header;

/// Decode BMP data to a canvas.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    layout: BmpRowLayout,
) -> Result<PixelCanvas, BitmapError> {
    let header = decode::parse_bmp_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    let palette = decode::read_palette(data, &header)?;
    decode::expand_pixels(data, &header, palette, layout)
}
