//! Generators for on-disk test directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::fixtures::files::DEMO_FILES;

/// Create an empty file at `dir/name`, creating parent directories.
pub fn touch(dir: &Path, name: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, b"")?;
    Ok(path)
}

/// Temporary directory holding the nine demo files.
pub fn demo_data_dir() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for (_, name) in DEMO_FILES {
        touch(dir.path(), name)?;
    }
    Ok(dir)
}
