//! PNG encoder: 8-bit RGBA, non-interlaced, binary alpha.

use std::io::Write;

use png::{BitDepth, ColorType};

use crate::error::BitmapError;
use crate::pixel::PixelCanvas;

/// zlib effort for the PNG encoder.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl From<PngCompression> for png::Compression {
    fn from(c: PngCompression) -> Self {
        match c {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Default => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        }
    }
}

/// Stream `canvas` into `w` one row at a time.
pub(crate) fn encode_png<W: Write>(
    canvas: &PixelCanvas,
    w: W,
    compression: PngCompression,
) -> Result<(), BitmapError> {
    if canvas.is_empty() {
        return Err(BitmapError::OutOfBounds(
            "cannot encode an empty canvas".into(),
        ));
    }

    let mut encoder = png::Encoder::new(w, canvas.width(), canvas.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(compression.into());

    let mut writer = encoder.write_header()?;
    let mut stream = writer.stream_writer()?;
    let mut row = vec![0u8; canvas.width() as usize * 4];
    for y in 0..canvas.height() {
        canvas.fill_rgba_row(y, &mut row);
        stream.write_all(&row)?;
    }
    stream.finish()?;
    writer.finish()?;
    Ok(())
}
