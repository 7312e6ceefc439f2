use crate::error::BitmapError;

/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit). PNG decoding still refuses
/// frames over 1 GiB when `max_memory_bytes` is unset.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the decoded canvas (RGB buffer plus opacity mask).
    pub max_memory_bytes: Option<u64>,
    /// Maximum size of an input file, checked before it is read.
    pub max_input_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(BitmapError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(BitmapError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels {
            if pixels > max_px {
                return Err(BitmapError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        if let Some(max_mem) = self.max_memory_bytes {
            // 3 RGB bytes plus one opacity flag per pixel
            let bytes = pixels.saturating_mul(4);
            if bytes > max_mem {
                return Err(BitmapError::LimitExceeded(format!(
                    "canvas of {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// Check an input size before reading it.
    pub(crate) fn check_input(&self, bytes: u64) -> Result<(), BitmapError> {
        if let Some(max_in) = self.max_input_bytes {
            if bytes > max_in {
                return Err(BitmapError::LimitExceeded(format!(
                    "input of {bytes} bytes exceeds limit {max_in}"
                )));
            }
        }
        Ok(())
    }
}
