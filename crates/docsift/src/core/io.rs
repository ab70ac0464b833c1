//! Stream helpers shared by sources, the backend and decoders.

use crate::{DocsiftError, Result};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Read up to `limit` bytes from the head of `stream`.
///
/// Returns fewer bytes only when the stream ends first.
///
/// # Errors
///
/// Returns `DocsiftError::Io` for I/O errors (these always bubble up).
pub fn read_prefix(stream: &mut dyn Read, limit: usize) -> Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(limit.min(64 * 1024));
    Read::take(&mut *stream, limit as u64)
        .read_to_end(&mut prefix)
        .map_err(DocsiftError::Io)?;
    Ok(prefix)
}

/// Put an already-consumed `prefix` back in front of the rest of `stream`.
pub fn rechain<'a>(prefix: Vec<u8>, stream: &'a mut dyn Read) -> impl Read + 'a {
    Cursor::new(prefix).chain(stream)
}

/// Drain `stream` into memory.
///
/// # Errors
///
/// Returns `DocsiftError::Io` for I/O errors.
pub fn read_all(stream: &mut dyn Read) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer).map_err(DocsiftError::Io)?;
    Ok(buffer)
}

/// Open a file for reading, together with its length when the filesystem reports one.
///
/// # Errors
///
/// Returns `DocsiftError::Io` if the file is missing or unreadable, or
/// `DocsiftError::Validation` if the path names a directory.
pub fn open_file(path: impl AsRef<Path>) -> Result<(File, Option<u64>)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(DocsiftError::Io)?;
    let metadata = file.metadata().map_err(DocsiftError::Io)?;

    if metadata.is_dir() {
        return Err(DocsiftError::validation(format!(
            "Path is a directory, not a file: {}",
            path.display()
        )));
    }

    Ok((file, Some(metadata.len())))
}
