//! PNG decoding on top of the `png` crate.
//!
//! The crate is only asked to strip 16-bit samples. Palette images keep their
//! indices so that index 0 can act as the colorkey, and sub-byte rows are
//! unpacked here. Every alpha channel is collapsed to a boolean.

use png::{BitDepth, ColorType, Transformations};

use super::unpack::expand_bits_to_byte;
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::{PixelCanvas, pixel_count};

pub(crate) const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Frame buffer ceiling when the caller sets no `max_memory_bytes`.
const DEFAULT_FRAME_BUDGET: u64 = 1 << 30;

/// Fields from the IHDR chunk.
#[derive(Debug)]
pub(crate) struct PngHeader {
    pub width: u32,
    pub height: u32,
    bit_depth: u8,
    color_type: u8,
}

impl PngHeader {
    /// Bytes the decoded frame occupies after 16-bit stripping, or `None` if
    /// that does not fit in a `u64`. Unknown colour types are sized as RGBA so
    /// the estimate stays an upper bound; the decoder rejects them later.
    fn frame_len(&self) -> Option<u64> {
        let samples: u64 = match self.color_type {
            0 | 3 => 1,
            4 => 2,
            2 => 3,
            _ => 4,
        };
        let bits = u64::from(self.bit_depth.clamp(1, 8));
        let row_bits = u64::from(self.width) * samples * bits;
        row_bits.div_ceil(8).checked_mul(u64::from(self.height))
    }
}

/// Check the signature and read the IHDR dimensions without decoding.
pub(crate) fn parse_png_header(data: &[u8]) -> Result<PngHeader, BitmapError> {
    if data.get(..8) != Some(SIGNATURE.as_slice()) {
        return Err(BitmapError::UnrecognizedFormat("not a valid PNG file".into()));
    }
    let ihdr = data.get(8..26).ok_or(BitmapError::UnexpectedEof)?;
    if &ihdr[4..8] != b"IHDR" {
        return Err(BitmapError::InvalidHeader(
            "PNG does not start with an IHDR chunk".into(),
        ));
    }
    let width = u32::from_be_bytes([ihdr[8], ihdr[9], ihdr[10], ihdr[11]]);
    let height = u32::from_be_bytes([ihdr[12], ihdr[13], ihdr[14], ihdr[15]]);
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidHeader(
            "invalid image dimensions".into(),
        ));
    }
    Ok(PngHeader {
        width,
        height,
        bit_depth: ihdr[16],
        color_type: ihdr[17],
    })
}

pub(crate) fn decode_png_pixels(
    data: &[u8],
    limits: Option<&Limits>,
) -> Result<PixelCanvas, BitmapError> {
    let header = parse_png_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }

    let max_memory = limits.and_then(|l| l.max_memory_bytes);
    let budget = max_memory.unwrap_or(DEFAULT_FRAME_BUDGET);
    match header.frame_len() {
        Some(len) if len <= budget => {}
        len => {
            return Err(BitmapError::LimitExceeded(match len {
                Some(len) => format!("PNG frame needs {len} bytes, budget is {budget}"),
                None => "PNG frame size overflows".into(),
            }));
        }
    }

    let decoder_limits = match max_memory {
        Some(bytes) => png::Limits {
            bytes: usize::try_from(bytes).unwrap_or(usize::MAX),
        },
        None => png::Limits::default(),
    };
    let mut decoder = png::Decoder::new_with_limits(data, decoder_limits);
    decoder.set_transformations(Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let (width, height) = (frame.width, frame.height);
    let w = width as usize;
    let count = pixel_count(width, height)?;
    tracing::trace!(
        width,
        height,
        color_type = ?frame.color_type,
        bit_depth = ?frame.bit_depth,
        "decoded PNG frame"
    );

    let mut pixels = vec![0u8; count * 3];
    let mut opacity = vec![false; count];
    let rows = buf
        .chunks_exact(frame.line_size)
        .take(height as usize)
        .zip(pixels.chunks_exact_mut(w * 3).zip(opacity.chunks_exact_mut(w)));

    match frame.color_type {
        ColorType::Indexed => {
            let palette = reader
                .info()
                .palette
                .as_deref()
                .ok_or_else(|| BitmapError::CorruptData("indexed PNG has no palette".into()))?;
            let entries = palette.len() / 3;
            let mut indices = vec![0u8; w];
            for (row, (out_rgb, out_opaque)) in rows {
                expand_bits_to_byte(frame.bit_depth as u8, true, row, &mut indices);
                for ((&idx, rgb), opaque) in indices
                    .iter()
                    .zip(out_rgb.chunks_exact_mut(3))
                    .zip(out_opaque.iter_mut())
                {
                    let idx = usize::from(idx);
                    if idx >= entries {
                        return Err(BitmapError::CorruptData(format!(
                            "palette index {idx} out of range (palette has {entries} entries)"
                        )));
                    }
                    *opaque = idx != 0;
                    rgb.copy_from_slice(&palette[idx * 3..idx * 3 + 3]);
                }
            }
        }
        ColorType::Rgb => {
            require_eight_bit(frame.bit_depth, "RGB")?;
            for (row, (out_rgb, out_opaque)) in rows {
                out_rgb.copy_from_slice(&row[..w * 3]);
                out_opaque.fill(true);
            }
        }
        ColorType::Rgba => {
            require_eight_bit(frame.bit_depth, "RGBA")?;
            for (row, (out_rgb, out_opaque)) in rows {
                for ((px, rgb), opaque) in row
                    .chunks_exact(4)
                    .zip(out_rgb.chunks_exact_mut(3))
                    .zip(out_opaque.iter_mut())
                {
                    rgb.copy_from_slice(&px[..3]);
                    *opaque = px[3] != 0;
                }
            }
        }
        ColorType::Grayscale => {
            let mut gray = vec![0u8; w];
            for (row, (out_rgb, out_opaque)) in rows {
                expand_bits_to_byte(frame.bit_depth as u8, false, row, &mut gray);
                for (&g, rgb) in gray.iter().zip(out_rgb.chunks_exact_mut(3)) {
                    rgb.fill(g);
                }
                out_opaque.fill(true);
            }
        }
        ColorType::GrayscaleAlpha => {
            require_eight_bit(frame.bit_depth, "gray+alpha")?;
            for (row, (out_rgb, out_opaque)) in rows {
                for ((px, rgb), opaque) in row
                    .chunks_exact(2)
                    .zip(out_rgb.chunks_exact_mut(3))
                    .zip(out_opaque.iter_mut())
                {
                    rgb.fill(px[0]);
                    *opaque = px[1] != 0;
                }
            }
        }
    }

    PixelCanvas::from_raw(width, height, pixels, opacity)
}

fn require_eight_bit(depth: BitDepth, what: &str) -> Result<(), BitmapError> {
    if depth == BitDepth::Eight {
        Ok(())
    } else {
        Err(BitmapError::UnsupportedVariant(format!(
            "{what} PNG with {depth:?} bit depth"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn encode(
        width: u32,
        height: u32,
        color: ColorType,
        depth: BitDepth,
        palette: Option<&[u8]>,
        data: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if let Some(palette) = palette {
                encoder.set_palette(palette.to_vec());
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    fn decode(data: &[u8]) -> Result<PixelCanvas, BitmapError> {
        decode_png_pixels(data, None)
    }

    fn chunk(out: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(body);
        let mut crc = flate2::Crc::new();
        crc.update(kind);
        crc.update(body);
        out.extend_from_slice(&crc.sum().to_be_bytes());
    }

    /// PNG assembled by hand from an IHDR and one IDAT payload.
    fn handmade(width: u32, height: u32, color: u8, interlace: u8, idat: &[u8]) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, color, 0, 0, interlace]);
        let mut out = SIGNATURE.to_vec();
        chunk(&mut out, b"IHDR", &ihdr);
        chunk(&mut out, b"IDAT", idat);
        chunk(&mut out, b"IEND", &[]);
        out
    }

    fn zlib(raw: &[u8]) -> Vec<u8> {
        use std::io::Write;
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(raw).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn rgba_alpha_is_binarized() {
        let data = encode(
            3,
            1,
            ColorType::Rgba,
            BitDepth::Eight,
            None,
            &[10, 20, 30, 1, 40, 50, 60, 0, 70, 80, 90, 255],
        );
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.opacity(), &[true, false, true]);
        assert_eq!(canvas.rgb_at(0, 0), Some([10, 20, 30]));
        assert_eq!(canvas.rgb_at(2, 0), Some([70, 80, 90]));
    }

    #[test]
    fn rgb_is_fully_opaque() {
        let data = encode(2, 1, ColorType::Rgb, BitDepth::Eight, None, &[0, 0, 0, 1, 2, 3]);
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.opacity(), &[true, true]);
        assert_eq!(canvas.pixels(), &[0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn indexed_uses_colorkey_zero() {
        let palette = [1, 2, 3, 200, 100, 50];
        let data = encode(2, 2, ColorType::Indexed, BitDepth::Eight, Some(&palette), &[0, 1, 1, 0]);
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.opacity(), &[false, true, true, false]);
        assert_eq!(canvas.rgb_at(1, 0), Some([200, 100, 50]));
        assert_eq!(canvas.rgb_at(0, 0), Some([1, 2, 3]));
    }

    #[test]
    fn indexed_four_bit() {
        let mut palette = vec![0u8; 16 * 3];
        palette[15 * 3..].copy_from_slice(&[9, 8, 7]);
        // 3 pixels per row: indices 15, 0, 15 packed into 2 bytes per row
        let data = encode(
            3,
            2,
            ColorType::Indexed,
            BitDepth::Four,
            Some(&palette),
            &[0xF0, 0xF0, 0x0F, 0x00],
        );
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.opacity(), &[true, false, true, false, true, false]);
        assert_eq!(canvas.rgb_at(2, 0), Some([9, 8, 7]));
        assert_eq!(canvas.rgb_at(1, 1), Some([9, 8, 7]));
    }

    #[test]
    fn index_past_palette_is_corrupt() {
        let palette = [1, 2, 3, 4, 5, 6];
        let data = encode(1, 1, ColorType::Indexed, BitDepth::Eight, Some(&palette), &[5]);
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::CorruptData);
    }

    #[test]
    fn grayscale_variants() {
        let data = encode(2, 1, ColorType::Grayscale, BitDepth::Eight, None, &[0, 77]);
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.opacity(), &[true, true]);
        assert_eq!(canvas.rgb_at(1, 0), Some([77, 77, 77]));

        let data = encode(4, 1, ColorType::Grayscale, BitDepth::Two, None, &[0b00_01_10_11]);
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.pixels()[..3], [0, 0, 0]);
        assert_eq!(canvas.rgb_at(1, 0), Some([0x55; 3]));
        assert_eq!(canvas.rgb_at(3, 0), Some([0xFF; 3]));

        let data = encode(2, 1, ColorType::GrayscaleAlpha, BitDepth::Eight, None, &[50, 0, 60, 3]);
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.opacity(), &[false, true]);
        assert_eq!(canvas.rgb_at(1, 0), Some([60, 60, 60]));
    }

    #[test]
    fn sixteen_bit_is_stripped() {
        let data = encode(
            1,
            1,
            ColorType::Rgba,
            BitDepth::Sixteen,
            None,
            &[0xAB, 0xCD, 0x12, 0x34, 0x00, 0x01, 0x00, 0x01],
        );
        let canvas = decode(&data).unwrap();
        assert_eq!(canvas.rgb_at(0, 0), Some([0xAB, 0x12, 0x00]));
        // alpha 0x0001 strips to 0x00
        assert_eq!(canvas.is_opaque(0, 0), Some(false));
    }

    #[test]
    fn bad_signature() {
        let mut data = encode(1, 1, ColorType::Rgb, BitDepth::Eight, None, &[1, 2, 3]);
        data[1] = b'Q';
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(decode(b"\x89PNG").unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn zero_dimension_header() {
        let mut data = encode(1, 1, ColorType::Rgb, BitDepth::Eight, None, &[1, 2, 3]);
        data[16..20].copy_from_slice(&0u32.to_be_bytes());
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn truncated_stream_is_corrupt() {
        let data = encode(8, 8, ColorType::Rgb, BitDepth::Eight, None, &[7; 8 * 8 * 3]);
        let err = decode(&data[..data.len() - 20]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptData);
        assert_eq!(decode(&data[..20]).unwrap_err().kind(), ErrorKind::CorruptData);
    }

    #[test]
    fn huge_header_is_rejected_before_allocating() {
        let data = handmade(0x7fff_ffff, 0x7fff_ffff, 6, 0, &[]);
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::LimitExceeded);

        let data = handmade(u32::MAX, u32::MAX, 6, 0, &[]);
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn small_header_with_empty_idat_is_corrupt() {
        let data = handmade(4, 4, 2, 0, &[]);
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::CorruptData);
    }

    #[test]
    fn frame_budget_follows_max_memory_bytes() {
        let data = encode(8, 8, ColorType::Grayscale, BitDepth::Eight, None, &[5; 64]);
        // the 256-byte canvas does not fit in 100 bytes
        let limits = Limits {
            max_memory_bytes: Some(100),
            ..Default::default()
        };
        assert_eq!(
            decode_png_pixels(&data, Some(&limits)).unwrap_err().kind(),
            ErrorKind::LimitExceeded
        );
        let limits = Limits {
            max_memory_bytes: Some(1 << 20),
            ..Default::default()
        };
        assert!(decode_png_pixels(&data, Some(&limits)).is_ok());
    }

    #[test]
    fn adam7_matches_progressive() {
        const PASSES: [(u32, u32, usize, usize); 7] = [
            (0, 0, 8, 8),
            (4, 0, 8, 8),
            (0, 4, 4, 8),
            (2, 0, 4, 4),
            (0, 2, 2, 4),
            (1, 0, 2, 2),
            (0, 1, 1, 2),
        ];
        let (w, h) = (5u32, 6u32);
        let pixel = |x: u32, y: u32| -> [u8; 4] {
            let alpha = if (x + y) % 3 == 0 { 0 } else { 200 };
            [(x * 40) as u8, (y * 40) as u8, (x * 7 + y) as u8, alpha]
        };

        let mut progressive = Vec::new();
        for y in 0..h {
            for x in 0..w {
                progressive.extend_from_slice(&pixel(x, y));
            }
        }

        let mut raw = Vec::new();
        for (x0, y0, dx, dy) in PASSES {
            let xs: Vec<u32> = (x0..w).step_by(dx).collect();
            if xs.is_empty() {
                continue;
            }
            for y in (y0..h).step_by(dy) {
                raw.push(0);
                for &x in &xs {
                    raw.extend_from_slice(&pixel(x, y));
                }
            }
        }

        let interlaced = decode(&handmade(w, h, 6, 1, &zlib(&raw))).unwrap();
        let plain = decode(&encode(w, h, ColorType::Rgba, BitDepth::Eight, None, &progressive)).unwrap();
        assert_eq!(interlaced, plain);
        assert_eq!(interlaced.is_opaque(0, 0), Some(false));
        assert_eq!(interlaced.rgb_at(4, 5), Some([160, 200, 33]));
    }

    #[test]
    fn trns_chunk_is_ignored() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 2, 1);
            encoder.set_color(ColorType::Indexed);
            encoder.set_depth(BitDepth::Eight);
            encoder.set_palette(vec![10, 20, 30, 40, 50, 60]);
            // index 0 opaque, index 1 fully transparent
            encoder.set_trns(vec![255, 0]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 1]).unwrap();
        }
        let canvas = decode(&out).unwrap();
        assert_eq!(canvas.opacity(), &[false, true]);
        assert_eq!(canvas.rgb_at(1, 0), Some([40, 50, 60]));
    }
}
