use std::path::Path;

use crate::error::BitmapError;
use crate::{bmp, png, xyz};

/// Supported image formats.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// zlib-compressed 8-bit indexed tiles (`XYZ1`).
    Xyz,
    /// 8-bit paletted Windows bitmap.
    Bmp,
    /// PNG, any colour type.
    Png,
}

impl ImageFormat {
    /// Format for a file extension, compared case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xyz" => Some(Self::Xyz),
            "bmp" => Some(Self::Bmp),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Format from the path's extension.
    ///
    /// Returns [`BitmapError::UnrecognizedFormat`] (with the path attached)
    /// when the extension is missing or unknown.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
        let path = path.as_ref();
        Self::from_extension(&crate::fs::extension(path)).ok_or_else(|| {
            BitmapError::UnrecognizedFormat("could not determine file type".into()).at(path)
        })
    }

    /// Format from the leading magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(xyz::decode::MAGIC) {
            Some(Self::Xyz)
        } else if data.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if data.starts_with(&png::SIGNATURE) {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Conventional lowercase extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xyz => "xyz",
            Self::Bmp => "bmp",
            Self::Png => "png",
        }
    }
}

/// Header-level facts about an image, read without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl ImageInfo {
    /// Probe in-memory data, detecting the format from magic bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        let format = ImageFormat::detect(data).ok_or_else(|| {
            BitmapError::UnrecognizedFormat("unknown magic bytes".into())
        })?;
        Self::from_bytes_as(data, format)
    }

    /// Probe in-memory data as a known format.
    pub fn from_bytes_as(data: &[u8], format: ImageFormat) -> Result<Self, BitmapError> {
        let (width, height) = match format {
            ImageFormat::Xyz => xyz::decode::parse_header(data)?,
            ImageFormat::Bmp => {
                let header = bmp::parse_bmp_header(data)?;
                (header.width, header.height)
            }
            ImageFormat::Png => {
                let header = png::parse_png_header(data)?;
                (header.width, header.height)
            }
        };
        Ok(Self {
            width,
            height,
            format,
        })
    }

    /// Probe a file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        let data = crate::fs::read_file(path)?;
        Self::from_bytes_as(&data, format).map_err(|e| e.at(path))
    }
}
