//! Directory listing for a data source root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nwp_common::{FileSystem, LocalFileSystem, NwpError, NwpResult};

/// Lists the files under a data directory.
#[derive(Clone)]
pub struct DirectoryScanner {
    fs: Arc<dyn FileSystem>,
}

impl DirectoryScanner {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Scanner over the local disk.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalFileSystem))
    }

    /// Regular files under `root`, relative to it, in lexicographic order.
    ///
    /// A missing or unreadable root is reported as `SourceUnavailable`.
    pub fn list_files(&self, root: &Path, recursive: bool) -> NwpResult<Vec<PathBuf>> {
        let mut files = self
            .fs
            .list_files(root, recursive)
            .map_err(|e| NwpError::SourceUnavailable {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;
        files.sort();
        Ok(files)
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::local()
    }
}

impl std::fmt::Debug for DirectoryScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryScanner").finish_non_exhaustive()
    }
}
