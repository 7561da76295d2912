//! In-memory filesystem for scanner and staleness tests.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use nwp_common::FileSystem;

/// Files keyed by absolute path, each with a modification time.
///
/// Directories exist implicitly as parents of files, plus any added with
/// [`MemoryFileSystem::add_dir`]. Listing order follows insertion order so
/// tests can exercise scan-order dependent behavior.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<Vec<(PathBuf, DateTime<Utc>)>>,
    dirs: Mutex<BTreeMap<PathBuf, ()>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, dir: impl Into<PathBuf>) {
        self.dirs.lock().unwrap().insert(dir.into(), ());
    }

    /// Add a file, or update its modification time if present.
    pub fn add_file(&self, path: impl Into<PathBuf>, modified: DateTime<Utc>) {
        let path = path.into();
        let mut files = self.files.lock().unwrap();
        match files.iter_mut().find(|(p, _)| *p == path) {
            Some(existing) => existing.1 = modified,
            None => files.push((path, modified)),
        }
    }

    pub fn remove_file(&self, path: &Path) {
        self.files.lock().unwrap().retain(|(p, _)| p != path);
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains_key(path)
            || self
                .files
                .lock()
                .unwrap()
                .iter()
                .any(|(p, _)| p.starts_with(path) && p != path)
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(root) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", root.display()),
            ));
        }
        let files = self.files.lock().unwrap();
        Ok(files
            .iter()
            .filter_map(|(p, _)| p.strip_prefix(root).ok())
            .filter(|rel| recursive || rel.components().count() == 1)
            .map(Path::to_path_buf)
            .collect())
    }

    fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, m)| *m)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::time::demo_init_time;

    #[test]
    fn test_listing() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/data/b.nc", demo_init_time());
        fs.add_file("/data/a.nc", demo_init_time());
        fs.add_file("/data/sub/c.nc", demo_init_time());

        let flat = fs.list_files(Path::new("/data"), false).unwrap();
        assert_eq!(flat, vec![PathBuf::from("b.nc"), PathBuf::from("a.nc")]);

        let deep = fs.list_files(Path::new("/data"), true).unwrap();
        assert_eq!(deep.len(), 3);

        assert!(fs.list_files(Path::new("/missing"), false).is_err());
    }

    #[test]
    fn test_empty_dir_and_mtime() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/empty");
        assert!(fs.list_files(Path::new("/empty"), false).unwrap().is_empty());

        fs.add_file("/empty/x.nc", demo_init_time());
        assert_eq!(fs.modified(Path::new("/empty/x.nc")).unwrap(), demo_init_time());
        fs.remove_file(Path::new("/empty/x.nc"));
        assert!(fs.modified(Path::new("/empty/x.nc")).is_err());
    }
}
