//! Colorkey compositing of one canvas onto another.

use crate::error::BitmapError;
use crate::pixel::PixelCanvas;

impl PixelCanvas {
    /// Copy a `width` x `height` region of `src` starting at `(src_x, src_y)`
    /// onto this canvas at `(dest_x, dest_y)`.
    ///
    /// Opaque source pixels overwrite the destination color and mark it opaque.
    /// Transparent source pixels leave the destination pixel untouched, so
    /// repeated blits layer in draw order.
    ///
    /// Returns [`BitmapError::OutOfBounds`] if either rectangle leaves its
    /// canvas. Nothing is written in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        dest_x: u32,
        dest_y: u32,
        src: &PixelCanvas,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), BitmapError> {
        check_rect("source", src, src_x, src_y, width, height)?;
        check_rect("destination", self, dest_x, dest_y, width, height)?;
        self.copy_opaque(dest_x, dest_y, src, src_x, src_y, width, height);
        Ok(())
    }

    /// Like [`Self::blit`], but the region is first clipped against both
    /// canvases instead of being rejected. Signed destination coordinates let
    /// a tile hang off the top or left edge.
    ///
    /// Returns the number of rows and columns actually copied.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_clipped(
        &mut self,
        dest_x: i64,
        dest_y: i64,
        src: &PixelCanvas,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
    ) -> (u32, u32) {
        let (dx, sx, w) = clip_axis(dest_x, self.width(), src_x, src.width(), width);
        let (dy, sy, h) = clip_axis(dest_y, self.height(), src_y, src.height(), height);
        if w > 0 && h > 0 {
            self.copy_opaque(dx, dy, src, sx, sy, w, h);
        }
        (w, h)
    }

    #[allow(clippy::too_many_arguments)]
    fn copy_opaque(
        &mut self,
        dest_x: u32,
        dest_y: u32,
        src: &PixelCanvas,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
    ) {
        for y in 0..height {
            let s_row = src.index_unchecked(src_x, src_y + y);
            let d_row = self.index_unchecked(dest_x, dest_y + y);
            let (pixels, opacity) = self.pixels_mut();
            for x in 0..width as usize {
                let s = s_row + x;
                if !src.opacity()[s] {
                    continue;
                }
                let d = d_row + x;
                opacity[d] = true;
                pixels[d * 3..d * 3 + 3].copy_from_slice(&src.pixels()[s * 3..s * 3 + 3]);
            }
        }
    }
}

fn check_rect(
    which: &str,
    canvas: &PixelCanvas,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<(), BitmapError> {
    let fits = |origin: u32, len: u32, limit: u32| {
        u64::from(origin) + u64::from(len) <= u64::from(limit)
    };
    if fits(x, width, canvas.width()) && fits(y, height, canvas.height()) {
        Ok(())
    } else {
        Err(BitmapError::OutOfBounds(format!(
            "{which} region {width}x{height} at ({x}, {y}) exceeds {}x{} canvas",
            canvas.width(),
            canvas.height()
        )))
    }
}

/// Clip one axis. Returns (dest start, src start, length).
fn clip_axis(dest: i64, dest_len: u32, src: u32, src_len: u32, len: u32) -> (u32, u32, u32) {
    let mut dest = dest;
    let mut src = i64::from(src);
    let mut len = i64::from(len);
    if dest < 0 {
        src -= dest;
        len += dest;
        dest = 0;
    }
    len = len
        .min(i64::from(dest_len) - dest)
        .min(i64::from(src_len) - src);
    if len <= 0 {
        return (0, 0, 0);
    }
    // All three fit in u32 once len > 0: dest < dest_len and src < src_len.
    (dest as u32, src as u32, len as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PixelCanvas {
        let count = (width * height) as usize;
        PixelCanvas::from_raw(width, height, rgb.repeat(count), vec![true; count]).unwrap()
    }

    #[test]
    fn blit_single_pixel_into_transparent_canvas() {
        let mut dest = PixelCanvas::new(2, 2);
        let src = solid(1, 1, [255, 0, 0]);
        dest.blit(1, 1, &src, 0, 0, 1, 1).unwrap();

        for (x, y) in [(0, 0), (0, 1), (1, 0)] {
            assert_eq!(dest.is_opaque(x, y), Some(false));
            assert_eq!(dest.rgb_at(x, y), Some([0, 0, 0]));
        }
        assert_eq!(dest.is_opaque(1, 1), Some(true));
        assert_eq!(dest.rgb_at(1, 1), Some([255, 0, 0]));
    }

    #[test]
    fn transparent_source_leaves_destination_identical() {
        let mut dest = solid(3, 3, [1, 2, 3]);
        dest.blit(0, 0, &PixelCanvas::new(2, 2), 0, 0, 2, 2).unwrap();
        assert_eq!(dest, solid(3, 3, [1, 2, 3]));

        let mut dest = PixelCanvas::new(3, 3);
        let before = dest.clone();
        dest.blit(1, 1, &PixelCanvas::new(2, 2), 0, 0, 2, 2).unwrap();
        assert_eq!(dest, before);
    }

    #[test]
    fn later_blits_draw_on_top_only_where_opaque() {
        let mut dest = PixelCanvas::new(2, 1);
        dest.blit(0, 0, &solid(2, 1, [9, 9, 9]), 0, 0, 2, 1).unwrap();

        let sprite =
            PixelCanvas::from_raw(2, 1, vec![0, 0, 0, 7, 7, 7], vec![false, true]).unwrap();
        dest.blit(0, 0, &sprite, 0, 0, 2, 1).unwrap();

        assert_eq!(dest.rgb_at(0, 0), Some([9, 9, 9]));
        assert_eq!(dest.rgb_at(1, 0), Some([7, 7, 7]));
        assert!(dest.opacity().iter().all(|&o| o));
    }

    #[test]
    fn sub_region_of_source() {
        // 4x1 strip of tiles, take the third
        let pixels = vec![10, 10, 10, 20, 20, 20, 30, 30, 30, 40, 40, 40];
        let strip = PixelCanvas::from_raw(4, 1, pixels, vec![true; 4]).unwrap();
        let mut dest = PixelCanvas::new(1, 1);
        dest.blit(0, 0, &strip, 2, 0, 1, 1).unwrap();
        assert_eq!(dest.rgb_at(0, 0), Some([30, 30, 30]));
    }

    #[test]
    fn out_of_range_rectangles_are_rejected() {
        let src = solid(2, 2, [1, 1, 1]);
        let mut dest = PixelCanvas::new(2, 2);
        let before = dest.clone();

        let err = dest.blit(1, 0, &src, 0, 0, 2, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = dest.blit(0, 0, &src, 1, 1, 2, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(dest.blit(u32::MAX, 0, &src, 0, 0, 1, 1).is_err());
        assert_eq!(dest, before);
    }

    #[test]
    fn zero_sized_region_is_a_no_op() {
        let mut dest = PixelCanvas::new(1, 1);
        dest.blit(1, 1, &solid(1, 1, [5, 5, 5]), 1, 1, 0, 0).unwrap();
        assert_eq!(dest, PixelCanvas::new(1, 1));
    }

    #[test]
    fn clipped_blit_off_the_edges() {
        let src = solid(2, 2, [8, 8, 8]);
        let mut dest = PixelCanvas::new(3, 3);

        assert_eq!(dest.blit_clipped(-1, -1, &src, 0, 0, 2, 2), (1, 1));
        assert_eq!(dest.is_opaque(0, 0), Some(true));
        assert_eq!(dest.opacity().iter().filter(|&&o| o).count(), 1);

        assert_eq!(dest.blit_clipped(2, 2, &src, 0, 0, 2, 2), (1, 1));
        assert_eq!(dest.is_opaque(2, 2), Some(true));

        assert_eq!(dest.blit_clipped(5, 0, &src, 0, 0, 2, 2), (0, 0));
        assert_eq!(dest.blit_clipped(-2, 0, &src, 0, 0, 2, 2), (0, 0));
        assert_eq!(dest.opacity().iter().filter(|&&o| o).count(), 2);
    }
}
