use std::path::Path;

use crate::error::BitmapError;
use crate::info::ImageFormat;
use crate::limits::Limits;
use crate::pixel::PixelCanvas;
use crate::bmp::{self, BmpRowLayout};
use crate::{png, xyz};

/// Decode request for in-memory data.
///
/// Without an explicit format the format is detected from magic bytes.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    format: Option<ImageFormat>,
    limits: Option<&'a Limits>,
    bmp_rows: BmpRowLayout,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            format: None,
            limits: None,
            bmp_rows: BmpRowLayout::Packed,
        }
    }

    /// Skip detection and decode as `format`.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Row layout for BMP pixel data. Packed unless set.
    pub fn with_bmp_rows(mut self, layout: BmpRowLayout) -> Self {
        self.bmp_rows = layout;
        self
    }

    pub fn decode(self) -> Result<PixelCanvas, BitmapError> {
        let format = match self.format {
            Some(format) => format,
            None => ImageFormat::detect(self.data).ok_or_else(|| {
                BitmapError::UnrecognizedFormat("unknown magic bytes".into())
            })?,
        };
        let canvas = match format {
            ImageFormat::Xyz => xyz::decode(self.data, self.limits)?,
            ImageFormat::Bmp => bmp::decode(self.data, self.limits, self.bmp_rows)?,
            ImageFormat::Png => png::decode(self.data, self.limits)?,
        };
        tracing::debug!(
            ?format,
            width = canvas.width(),
            height = canvas.height(),
            "decoded image"
        );
        Ok(canvas)
    }
}

/// Read `path` and decode it with the format named by its extension.
pub(crate) fn decode_path(path: &Path, limits: &Limits) -> Result<PixelCanvas, BitmapError> {
    let format = ImageFormat::from_path(path)?;
    let data = crate::fs::read_file_limited(path, limits)?;
    DecodeRequest::new(&data)
        .with_format(format)
        .with_limits(limits)
        .decode()
        .map_err(|e| e.at(path))
}
