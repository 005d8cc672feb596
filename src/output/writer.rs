//! Page persistence for the mirror tree

use crate::MirrorError;
use std::fs;
use std::path::Path;

/// Creates a directory and any missing parents
pub fn ensure_dir(path: &Path) -> Result<(), MirrorError> {
    fs::create_dir_all(path).map_err(|source| MirrorError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes an HTML page, creating its parent directory first
///
/// Content is written as UTF-8 exactly as given; verbatim snapshots are
/// never rewritten.
pub fn save_html(content: &str, path: &Path) -> Result<(), MirrorError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    fs::write(path, content).map_err(|source| MirrorError::Write {
        path: path.to_path_buf(),
        source,
    })
}
