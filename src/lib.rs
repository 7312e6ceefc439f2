//! # tilecanvas
//!
//! Decoders for legacy 8-bit game graphics and a compositor for rebuilding
//! full tileset and map images from individually stored tiles and sprites.
//!
//! Every input format is normalized into one [`PixelCanvas`]: RGB bytes plus a
//! one-bit opacity mask. Canvases are layered with [`blit`], which copies only
//! opaque pixels, and the result is written back out as PNG.
//!
//! ## Supported Formats
//!
//! - **XYZ**: `"XYZ1"` magic, u16 dimensions, zlib-compressed 256-colour
//!   palette and index bytes. Decode only.
//! - **BMP**: uncompressed 8-bit paletted Windows bitmaps. Decode only.
//! - **PNG**: every colour type and bit depth on decode; 8-bit RGBA on encode.
//!
//! ## Transparency
//!
//! Indexed formats (XYZ, BMP, palette PNG) treat palette index 0 as the
//! colorkey: it is transparent whatever colour the palette stores for it.
//! PNG alpha channels are binarized: any nonzero alpha is opaque. The encoder
//! writes alpha 255 or 0, so decode → encode keeps the mask exactly but not
//! partial transparency.
//!
//! ## Non-Goals
//!
//! - Alpha blending; opacity is strictly on/off
//! - Encoding XYZ or BMP
//! - Parsing the map files that reference these images
//!
//! ## Usage
//!
//! ```no_run
//! use tilecanvas::{blank_canvas, blit, decode, encode_png};
//!
//! let chipset = decode("ChipSet/World.xyz")?;
//! let mut map = blank_canvas(320, 240);
//!
//! // Stamp the 16x16 tile at (32, 0) of the chipset onto map cell (2, 3)
//! blit(&mut map, 2 * 16, 3 * 16, &chipset, 32, 0, 16, 16)?;
//!
//! encode_png(&map, "out/map0001.png")?;
//! # Ok::<(), tilecanvas::BitmapError>(())
//! ```

#![forbid(unsafe_code)]

mod bmp;
mod compose;
mod decode;
mod encode;
mod error;
pub mod fs;
mod info;
mod limits;
mod pixel;
mod png;
mod xyz;

use std::path::Path;

// Re-exports
pub use crate::bmp::BmpRowLayout;
pub use crate::png::PngCompression;
pub use decode::DecodeRequest;
pub use encode::EncodeRequest;
pub use error::{BitmapError, ErrorKind};
pub use info::{ImageFormat, ImageInfo};
pub use limits::Limits;
pub use pixel::PixelCanvas;

/// Decode the file at `path`, choosing the decoder by its extension
/// (`xyz`, `bmp` or `png`, case-insensitive).
///
/// Errors carry the path; see [`BitmapError::path`].
pub fn decode(path: impl AsRef<Path>) -> Result<PixelCanvas, BitmapError> {
    decode::decode_path(path.as_ref(), &Limits::default())
}

/// [`decode`] with resource limits applied before any pixel allocation.
pub fn decode_with_limits(
    path: impl AsRef<Path>,
    limits: &Limits,
) -> Result<PixelCanvas, BitmapError> {
    decode::decode_path(path.as_ref(), limits)
}

/// Decode in-memory data, detecting the format from its magic bytes.
pub fn decode_bytes(data: &[u8]) -> Result<PixelCanvas, BitmapError> {
    DecodeRequest::new(data).decode()
}

/// Decode XYZ data.
pub fn decode_xyz(data: &[u8]) -> Result<PixelCanvas, BitmapError> {
    DecodeRequest::new(data).with_format(ImageFormat::Xyz).decode()
}

/// Decode 8-bit paletted BMP data.
pub fn decode_bmp(data: &[u8]) -> Result<PixelCanvas, BitmapError> {
    DecodeRequest::new(data).with_format(ImageFormat::Bmp).decode()
}

/// Decode PNG data.
pub fn decode_png(data: &[u8]) -> Result<PixelCanvas, BitmapError> {
    DecodeRequest::new(data).with_format(ImageFormat::Png).decode()
}

/// Fully transparent canvas of the given size.
///
/// # Panics
///
/// Panics if the buffers would not fit in memory addressing; see
/// [`PixelCanvas::try_new`].
pub fn blank_canvas(width: u32, height: u32) -> PixelCanvas {
    PixelCanvas::new(width, height)
}

/// Fully transparent canvas, or `DimensionsTooLarge` if the buffers would
/// overflow.
pub fn try_blank_canvas(width: u32, height: u32) -> Result<PixelCanvas, BitmapError> {
    PixelCanvas::try_new(width, height)
}

/// Overlay a region of `src` onto `dest`. See [`PixelCanvas::blit`].
#[allow(clippy::too_many_arguments)]
pub fn blit(
    dest: &mut PixelCanvas,
    dest_x: u32,
    dest_y: u32,
    src: &PixelCanvas,
    src_x: u32,
    src_y: u32,
    width: u32,
    height: u32,
) -> Result<(), BitmapError> {
    dest.blit(dest_x, dest_y, src, src_x, src_y, width, height)
}

/// Overlay a region of `src` onto `dest`, clipping instead of failing.
/// See [`PixelCanvas::blit_clipped`].
#[allow(clippy::too_many_arguments)]
pub fn blit_clipped(
    dest: &mut PixelCanvas,
    dest_x: i64,
    dest_y: i64,
    src: &PixelCanvas,
    src_x: u32,
    src_y: u32,
    width: u32,
    height: u32,
) -> (u32, u32) {
    dest.blit_clipped(dest_x, dest_y, src, src_x, src_y, width, height)
}

/// Write `canvas` to `path` as 8-bit RGBA PNG.
pub fn encode_png(canvas: &PixelCanvas, path: impl AsRef<Path>) -> Result<(), BitmapError> {
    EncodeRequest::png().encode_to_path(canvas, path)
}

/// Encode `canvas` as 8-bit RGBA PNG in memory.
pub fn encode_png_to_vec(canvas: &PixelCanvas) -> Result<Vec<u8>, BitmapError> {
    EncodeRequest::png().encode(canvas)
}
