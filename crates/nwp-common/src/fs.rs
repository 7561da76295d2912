//! Filesystem abstraction used by the directory scanner and cache staleness checks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::WalkDir;

/// Directory listing and modification-time queries.
pub trait FileSystem: Send + Sync {
    /// List regular files under `root` as paths relative to `root`.
    ///
    /// Fails if `root` is missing, unreadable or not a directory. Problems
    /// with individual entries below `root` are skipped.
    fn list_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>>;

    /// Last modification time of `path`.
    fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>>;
}

/// The local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        let meta = fs::metadata(root)?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        let mut files = Vec::new();

        if !recursive {
            for entry in fs::read_dir(root)? {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                        continue;
                    }
                };
                if entry.path().is_file() {
                    files.push(PathBuf::from(entry.file_name()));
                }
            }
            return Ok(files);
        }

        for entry in WalkDir::new(root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }

        Ok(files)
    }

    fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files_flat_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.nc"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.nc"), b"").unwrap();

        let mut flat = LocalFileSystem.list_files(dir.path(), false).unwrap();
        flat.sort();
        assert_eq!(flat, vec![PathBuf::from("a.nc")]);

        let mut deep = LocalFileSystem.list_files(dir.path(), true).unwrap();
        deep.sort();
        assert_eq!(
            deep,
            vec![PathBuf::from("a.nc"), PathBuf::from("sub").join("b.nc")]
        );
    }

    #[test]
    fn test_list_files_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(LocalFileSystem.list_files(&missing, false).is_err());
        assert!(LocalFileSystem.list_files(&missing, true).is_err());
    }

    #[test]
    fn test_list_files_root_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(LocalFileSystem.list_files(&file, false).is_err());
    }

    #[test]
    fn test_modified() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.nc");
        fs::write(&file, b"x").unwrap();
        let mtime = LocalFileSystem.modified(&file).unwrap();
        assert!(mtime <= Utc::now() + chrono::Duration::seconds(5));
    }
}
