use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::BitmapError;
use crate::pixel::{PixelCanvas, pixel_count};

pub(crate) const MAGIC: &[u8; 4] = b"XYZ1";
const HEADER_LEN: usize = 8;
const PALETTE_LEN: usize = 256 * 3;

/// Parse the XYZ header, returning (width, height).
pub(crate) fn parse_header(data: &[u8]) -> Result<(u32, u32), BitmapError> {
    if data.get(..4) != Some(MAGIC.as_slice()) {
        return Err(BitmapError::UnrecognizedFormat("not a valid XYZ file".into()));
    }
    if data.len() <= HEADER_LEN {
        return Err(BitmapError::InvalidHeader(
            "XYZ file has no image data".into(),
        ));
    }
    let width = u16::from_le_bytes([data[4], data[5]]);
    let height = u16::from_le_bytes([data[6], data[7]]);
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "XYZ has zero dimensions ({width}x{height})"
        )));
    }
    Ok((u32::from(width), u32::from(height)))
}

/// Inflate the payload, which must be exactly palette + one byte per pixel.
pub(crate) fn inflate(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BitmapError> {
    let expected = PALETTE_LEN + pixel_count(width, height)?;
    let mut out = Vec::with_capacity(expected);
    // One byte of slack is enough to tell "too long" from "exact".
    ZlibDecoder::new(&data[HEADER_LEN..])
        .take(expected as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| BitmapError::Decompress(e.to_string()))?;
    if out.len() != expected {
        return Err(BitmapError::CorruptData(format!(
            "uncompressed XYZ data is {} bytes, expected {expected}",
            out.len()
        )));
    }
    Ok(out)
}

/// Map every index through the palette. Index 0 is transparent.
pub(crate) fn expand_indices(
    payload: &[u8],
    width: u32,
    height: u32,
) -> Result<PixelCanvas, BitmapError> {
    let (palette, indices) = payload.split_at(PALETTE_LEN);
    let mut pixels = vec![0u8; indices.len() * 3];
    let mut opacity = vec![false; indices.len()];

    for ((&idx, rgb), opaque) in indices
        .iter()
        .zip(pixels.chunks_exact_mut(3))
        .zip(opacity.iter_mut())
    {
        let entry = usize::from(idx) * 3;
        *opaque = idx != 0;
        rgb.copy_from_slice(&palette[entry..entry + 3]);
    }

    PixelCanvas::from_raw(width, height, pixels, opacity)
}
