use std::path::{Path, PathBuf};

/// Coarse classification of a [`BitmapError`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// File open/read/write failure.
    Io,
    /// Bad magic number, unknown extension, zero dimensions.
    Format,
    /// Decompression failure, size mismatch, truncated or inconsistent data.
    CorruptData,
    /// Valid file of a subtype this crate does not handle.
    UnsupportedFeature,
    /// Caller-supplied arguments out of range.
    InvalidArgument,
    /// A configured [`crate::Limits`] value was exceeded.
    LimitExceeded,
    /// Encoder library failure.
    Internal,
}

/// Errors from decoding, compositing and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognized format: {0}")]
    UnrecognizedFormat(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error("zlib error: {0}")]
    Decompress(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("region out of bounds: {0}")]
    OutOfBounds(String),

    #[error("buffer size mismatch: need {needed} entries, got {actual}")]
    BufferSizeMismatch { needed: usize, actual: usize },

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("unknown error while writing PNG")]
    EncodeFailed(#[source] png::EncodingError),

    #[error("{}: {source}", .path.display())]
    AtPath {
        path: PathBuf,
        #[source]
        source: Box<BitmapError>,
    },
}

impl BitmapError {
    /// The error category, looking through any path context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::UnrecognizedFormat(_) | Self::InvalidHeader(_) => ErrorKind::Format,
            Self::UnexpectedEof | Self::CorruptData(_) | Self::Decompress(_) | Self::PngDecode(_) => {
                ErrorKind::CorruptData
            }
            Self::UnsupportedVariant(_) => ErrorKind::UnsupportedFeature,
            Self::DimensionsTooLarge { .. } | Self::LimitExceeded(_) => ErrorKind::LimitExceeded,
            Self::OutOfBounds(_) | Self::BufferSizeMismatch { .. } => ErrorKind::InvalidArgument,
            Self::EncodeFailed(_) => ErrorKind::Internal,
            Self::AtPath { source, .. } => source.kind(),
        }
    }

    /// Attach the originating file path. Already-wrapped errors are left alone.
    pub fn at(self, path: impl AsRef<Path>) -> Self {
        match self {
            Self::AtPath { .. } => self,
            other => Self::AtPath {
                path: path.as_ref().to_path_buf(),
                source: Box::new(other),
            },
        }
    }

    /// The file path this error was raised for, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::AtPath { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<png::EncodingError> for BitmapError {
    fn from(e: png::EncodingError) -> Self {
        match e {
            png::EncodingError::IoError(io) => BitmapError::Io(io),
            other => BitmapError::EncodeFailed(other),
        }
    }
}

impl From<png::DecodingError> for BitmapError {
    fn from(e: png::DecodingError) -> Self {
        match e {
            png::DecodingError::LimitsExceeded => {
                BitmapError::LimitExceeded("PNG decoder memory limit".into())
            }
            other => BitmapError::PngDecode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_context_keeps_kind() {
        let err = BitmapError::UnsupportedVariant("BMP is compressed".into()).at("tiles/a.bmp");
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
        assert_eq!(err.path(), Some(Path::new("tiles/a.bmp")));
        assert_eq!(
            err.to_string(),
            "tiles/a.bmp: unsupported format variant: BMP is compressed"
        );
    }

    #[test]
    fn path_context_is_not_nested() {
        let err = BitmapError::UnexpectedEof.at("a.xyz").at("b.xyz");
        assert_eq!(err.path(), Some(Path::new("a.xyz")));
    }

    #[test]
    fn encode_failure_message_is_generic() {
        let png_err = png::Encoder::new(Vec::new(), 0, 1)
            .write_header()
            .err()
            .expect("zero width must be rejected");
        let err = BitmapError::from(png_err);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "unknown error while writing PNG");
    }
}
