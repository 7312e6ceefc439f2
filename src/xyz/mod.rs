//! XYZ tile/sprite decoder (internal).
//!
//! XYZ is a compressed indexed format: 4-byte magic (`"XYZ1"`), width and
//! height as u16 little-endian, then a zlib stream holding a 256-entry RGB
//! palette followed by one index byte per pixel. Index 0 is the colorkey.

pub(crate) mod decode;

use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelCanvas;

/// Decode XYZ data to a canvas.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<PixelCanvas, BitmapError> {
    let (width, height) = decode::parse_header(data)?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    let payload = decode::inflate(data, width, height)?;
    decode::expand_indices(&payload, width, height)
}
