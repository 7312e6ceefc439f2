use std::io::Write;
use std::path::Path;

use crate::error::BitmapError;
use crate::pixel::PixelCanvas;
use crate::png::{self, PngCompression};

/// Encode request. PNG is the only output format.
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest {
    compression: PngCompression,
}

impl EncodeRequest {
    /// 8-bit RGBA PNG with default compression.
    pub fn png() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: PngCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Encode into a new buffer.
    pub fn encode(&self, canvas: &PixelCanvas) -> Result<Vec<u8>, BitmapError> {
        let mut out = Vec::new();
        png::encode(canvas, &mut out, self.compression)?;
        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            bytes = out.len(),
            "encoded PNG"
        );
        Ok(out)
    }

    /// Encode straight to a file, creating or truncating it.
    ///
    /// If encoding fails after the file was created, the partial file is
    /// removed.
    pub fn encode_to_path(
        &self,
        canvas: &PixelCanvas,
        path: impl AsRef<Path>,
    ) -> Result<(), BitmapError> {
        let path = path.as_ref();
        let mut file = crate::fs::create_file(path)?;
        let written = png::encode(canvas, &mut file, self.compression)
            .and_then(|()| file.flush().map_err(BitmapError::from));
        if let Err(e) = written {
            drop(file);
            crate::fs::remove_partial(path);
            return Err(e.at(path));
        }
        tracing::debug!(path = %path.display(), "wrote PNG");
        Ok(())
    }
}
