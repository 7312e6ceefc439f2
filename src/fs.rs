//! The small slice of filesystem access the codecs need.
//!
//! Every error carries the path it was raised for.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::BitmapError;
use crate::limits::Limits;

/// Lowercased text after the last `.` of the file name, or `""` if none.
pub fn extension(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Size of the file in bytes.
pub fn file_size(path: impl AsRef<Path>) -> Result<u64, BitmapError> {
    let path = path.as_ref();
    std::fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|e| BitmapError::Io(e).at(path))
}

/// Read the whole file into memory.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>, BitmapError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| BitmapError::Io(e).at(path))
}

/// Read the whole file, refusing files larger than `limits.max_input_bytes`.
pub(crate) fn read_file_limited(path: &Path, limits: &Limits) -> Result<Vec<u8>, BitmapError> {
    if limits.max_input_bytes.is_some() {
        let size = file_size(path)?;
        limits.check_input(size).map_err(|e| e.at(path))?;
    }
    read_file(path)
}

/// Create (or truncate) a file for buffered binary writing.
pub fn create_file(path: impl AsRef<Path>) -> Result<BufWriter<File>, BitmapError> {
    let path = path.as_ref();
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| BitmapError::Io(e).at(path))
}

/// Best-effort removal of a file left behind by a failed write.
pub(crate) fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial file");
    }
}
