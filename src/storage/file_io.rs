//! File I/O utilities with atomic writes
//!
//! Output files are written to a uniquely named temporary sibling and
//! persisted into place, so a failed run never leaves a half-written payload
//! or plaintext behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{HoistError, HoistResult};

/// Read a whole file, naming the path in any error
pub fn read_bytes<P: AsRef<Path>>(path: P) -> HoistResult<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| HoistError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> HoistResult<()> {
    let path = path.as_ref();
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| {
                HoistError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
            parent
        }
        None => Path::new("."),
    };

    // Temp file must live in the same directory for the rename to be atomic;
    // it is removed on drop if anything below fails
    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| HoistError::Io(format!("Failed to create temp file: {}", e)))?;

    temp.write_all(data)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| HoistError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    temp.persist(path).map_err(|e| {
        HoistError::Io(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;

    debug!(path = %path.display(), bytes = data.len(), "Wrote file");
    Ok(())
}
