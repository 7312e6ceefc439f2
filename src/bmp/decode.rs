//! Header parsing and palette expansion for 8-bit BMP.
//!
//! Field offsets are absolute from the start of the file:
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 2    | `"BM"`                                  |
//! | 10     | 4    | pixel data offset                       |
//! | 14     | 4    | info header size (palette at 14 + this) |
//! | 18     | 4    | width (i32)                             |
//! | 22     | 4    | height (i32, negative = top-down)       |
//! | 26     | 2    | planes, must be 1                       |
//! | 28     | 2    | bits per pixel, must be 8               |
//! | 30     | 4    | compression, must be 0                  |
//! | 46     | 4    | palette entry count, 0 = 256            |

use crate::error::BitmapError;
use crate::pixel::{PixelCanvas, pixel_count};

/// How index rows are laid out after the pixel data offset.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BmpRowLayout {
    /// `width` bytes per row, back to back.
    #[default]
    Packed,
    /// Each row padded to a multiple of 4 bytes, as standard BMP writers do.
    Padded,
}

/// Fixed-position little-endian reads over the file bytes.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let end = self.pos.checked_add(N).ok_or(BitmapError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(buf)
    }

    fn get_u16_le(&mut self) -> Result<u16, BitmapError> {
        self.read_fixed_bytes().map(u16::from_le_bytes)
    }

    fn get_u32_le(&mut self) -> Result<u32, BitmapError> {
        self.read_fixed_bytes().map(u32::from_le_bytes)
    }

    fn get_i32_le(&mut self) -> Result<i32, BitmapError> {
        self.read_fixed_bytes().map(i32::from_le_bytes)
    }

    /// `len` bytes starting at `pos`, without moving the cursor.
    fn slice_at(&self, pos: usize, len: usize) -> Result<&'a [u8], BitmapError> {
        let end = pos.checked_add(len).ok_or(BitmapError::UnexpectedEof)?;
        self.data.get(pos..end).ok_or(BitmapError::UnexpectedEof)
    }
}

/// Parsed BMP header.
#[derive(Debug)]
pub(crate) struct BmpHeader {
    pub width: u32,
    pub height: u32,
    top_down: bool,
    pixel_offset: usize,
    palette_offset: usize,
    palette_entries: usize,
}

/// Parse and validate the header. Reads nothing past offset 50.
pub(crate) fn parse_bmp_header(data: &[u8]) -> Result<BmpHeader, BitmapError> {
    if data.get(..2) != Some(b"BM".as_slice()) {
        return Err(BitmapError::UnrecognizedFormat("not a valid BMP file".into()));
    }

    let mut bytes = Cursor::new(data);
    bytes.set_position(10);
    let pixel_offset = bytes.get_u32_le()? as usize;
    let palette_offset = (bytes.get_u32_le()? as usize).saturating_add(14);

    let width = bytes.get_i32_le()?;
    let height_field = bytes.get_i32_le()?;
    if width == 0 || height_field == 0 {
        return Err(BitmapError::InvalidHeader(
            "invalid image dimensions".into(),
        ));
    }
    if width < 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP width is negative ({width})"
        )));
    }

    let planes = bytes.get_u16_le()?;
    if planes != 1 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "number of BMP planes is {planes}, not 1"
        )));
    }
    let bpp = bytes.get_u16_le()?;
    if bpp != 8 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "BMP is {bpp}-bit, not 8-bit"
        )));
    }
    let compression = bytes.get_u32_le()?;
    if compression != 0 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "BMP is compressed (scheme {compression})"
        )));
    }

    bytes.set_position(46);
    let colors = bytes.get_u32_le()?;
    if colors > 256 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "BMP header specifies {colors} colors, more than 256"
        )));
    }
    let palette_entries = if colors == 0 { 256 } else { colors as usize };

    let header = BmpHeader {
        width: width as u32,
        height: height_field.unsigned_abs(),
        top_down: height_field < 0,
        pixel_offset,
        palette_offset,
        palette_entries,
    };
    tracing::trace!(?header, "parsed BMP header");
    Ok(header)
}

/// Read the palette as (B, G, R, reserved) quads.
pub(crate) fn read_palette<'a>(
    data: &'a [u8],
    header: &BmpHeader,
) -> Result<&'a [u8], BitmapError> {
    Cursor::new(data)
        .slice_at(header.palette_offset, header.palette_entries * 4)
        .map_err(|_| BitmapError::CorruptData("BMP palette runs past end of file".into()))
}

/// Resolve index rows through the palette into a canvas.
///
/// Rows are stored bottom-up unless the header height was negative. The row
/// stride comes from `layout`, never from how many bytes the file holds.
pub(crate) fn expand_pixels(
    data: &[u8],
    header: &BmpHeader,
    palette: &[u8],
    layout: BmpRowLayout,
) -> Result<PixelCanvas, BitmapError> {
    let (width, height) = (header.width, header.height);
    let count = pixel_count(width, height)?;
    let w = width as usize;
    let h = height as usize;

    let stride = match layout {
        BmpRowLayout::Packed => w,
        BmpRowLayout::Padded => w
            .checked_add(3)
            .map(|s| s & !3)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?,
    };
    let needed = stride
        .checked_mul(h - 1)
        .and_then(|n| n.checked_add(w))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let available = data.len().saturating_sub(header.pixel_offset);
    if available < needed {
        return Err(BitmapError::CorruptData(format!(
            "BMP pixel data has {available} bytes, need {needed}"
        )));
    }
    let rows = Cursor::new(data).slice_at(header.pixel_offset, needed)?;

    let mut pixels = vec![0u8; count * 3];
    let mut opacity = vec![false; count];
    let palette_entries = palette.len() / 4;

    for y in 0..h {
        let src_row = if header.top_down { y } else { h - 1 - y };
        let indices = &rows[src_row * stride..src_row * stride + w];
        let out_start = y * w;
        for (x, &byte) in indices.iter().enumerate() {
            let idx = usize::from(byte);
            if idx >= palette_entries {
                return Err(BitmapError::CorruptData(format!(
                    "palette index {idx} out of range (palette has {palette_entries} entries)"
                )));
            }
            let entry = &palette[idx * 4..idx * 4 + 4];
            let out = out_start + x;
            opacity[out] = idx != 0;
            pixels[out * 3] = entry[2];
            pixels[out * 3 + 1] = entry[1];
            pixels[out * 3 + 2] = entry[0];
        }
    }

    PixelCanvas::from_raw(width, height, pixels, opacity)
}
