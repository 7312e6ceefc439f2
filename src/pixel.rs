use crate::error::BitmapError;

/// An RGB image with a one-bit opacity mask.
///
/// Every decoder normalizes into this model. `pixels` holds 3 bytes (R, G, B)
/// per pixel in row-major order and `opacity` one flag per pixel. A `false`
/// flag marks a colorkey pixel whose RGB bytes carry no meaning.
///
/// Both buffers are always sized together: `pixels.len() == width * height * 3`
/// and `opacity.len() == width * height`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    opacity: Vec<bool>,
}

impl PixelCanvas {
    /// Blank canvas: zero-filled RGB and every pixel transparent.
    ///
    /// # Panics
    ///
    /// Panics if the buffer length overflows `usize`. Use [`Self::try_new`]
    /// for untrusted dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Ok(canvas) => canvas,
            Err(e) => panic!("{e}"),
        }
    }

    /// Blank canvas, failing instead of panicking on oversized dimensions.
    pub fn try_new(width: u32, height: u32) -> Result<Self, BitmapError> {
        let count = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; count * 3],
            opacity: vec![false; count],
        })
    }

    /// Build a canvas from already populated buffers.
    ///
    /// Returns [`BitmapError::BufferSizeMismatch`] unless `pixels` holds exactly
    /// `width * height * 3` bytes and `opacity` exactly `width * height` flags.
    pub fn from_raw(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        opacity: Vec<bool>,
    ) -> Result<Self, BitmapError> {
        let count = pixel_count(width, height)?;
        if pixels.len() != count * 3 {
            return Err(BitmapError::BufferSizeMismatch {
                needed: count * 3,
                actual: pixels.len(),
            });
        }
        if opacity.len() != count {
            return Err(BitmapError::BufferSizeMismatch {
                needed: count,
                actual: opacity.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            opacity,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Row-major opacity flags.
    pub fn opacity(&self) -> &[bool] {
        &self.opacity
    }

    /// True for the 0x0 placeholder canvas.
    pub fn is_empty(&self) -> bool {
        self.opacity.is_empty()
    }

    /// Flat pixel index of `(x, y)`, or `None` outside the canvas.
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| self.index_unchecked(x, y))
    }

    /// `y * width + x` without the range check. Callers validate first.
    pub(crate) fn index_unchecked(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// RGB of the pixel at `(x, y)`. Returned for transparent pixels too.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let i = self.index(x, y)? * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Whether the pixel at `(x, y)` is opaque.
    pub fn is_opaque(&self, x: u32, y: u32) -> Option<bool> {
        Some(self.opacity[self.index(x, y)?])
    }

    /// RGBA bytes with alpha 255 for opaque pixels and 0 for transparent ones.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.opacity.len() * 4);
        for (rgb, &opaque) in self.pixels.chunks_exact(3).zip(&self.opacity) {
            out.extend_from_slice(rgb);
            out.push(if opaque { 255 } else { 0 });
        }
        out
    }

    /// Write one row of RGBA into `row`, which must hold `width * 4` bytes.
    pub(crate) fn fill_rgba_row(&self, y: u32, row: &mut [u8]) {
        let start = self.index_unchecked(0, y);
        let end = start + self.width as usize;
        for ((out, rgb), &opaque) in row
            .chunks_exact_mut(4)
            .zip(self.pixels[start * 3..end * 3].chunks_exact(3))
            .zip(&self.opacity[start..end])
        {
            out[..3].copy_from_slice(rgb);
            out[3] = if opaque { 255 } else { 0 };
        }
    }

    pub(crate) fn pixels_mut(&mut self) -> (&mut [u8], &mut [bool]) {
        (&mut self.pixels, &mut self.opacity)
    }

    /// Reinterpret the RGB buffer as typed pixels.
    #[cfg(feature = "rgb")]
    pub fn as_rgb(&self) -> &[rgb::RGB8] {
        use rgb::AsPixels as _;
        self.pixels.as_pixels()
    }

    /// Copy into an [`imgref::ImgVec`] of RGBA pixels with binary alpha.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        let pixels = self
            .as_rgb()
            .iter()
            .zip(&self.opacity)
            .map(|(px, &opaque)| rgb::RGBA8::new(px.r, px.g, px.b, if opaque { 255 } else { 0 }))
            .collect();
        imgref::ImgVec::new(pixels, self.width as usize, self.height as usize)
    }
}

/// `width * height`, failing when the RGB buffer length would overflow.
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize, BitmapError> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|count| count.checked_mul(3).is_some())
        .ok_or(BitmapError::DimensionsTooLarge { width, height })
}
