//! Builds the [`FileTree`] for a data source from a directory scan.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nwp_common::NwpResult;
use tracing::debug;

use crate::codec::FilenameCodec;
use crate::scanner::DirectoryScanner;
use crate::source::DataSource;
use crate::tree::FileTree;

/// Scans data sources and indexes their files.
#[derive(Debug, Clone, Default)]
pub struct FileTreeIndexer {
    scanner: DirectoryScanner,
}

impl FileTreeIndexer {
    pub fn new(scanner: DirectoryScanner) -> Self {
        Self { scanner }
    }

    /// Unfiltered scan result for `source`, relative to its root.
    pub fn all_data_files(&self, source: &DataSource) -> NwpResult<Vec<PathBuf>> {
        self.scanner.list_files(source.root(), source.recursive())
    }

    /// Rebuild the tree from a fresh scan.
    ///
    /// Files that do not decode, or that belong to another grid or model,
    /// are left out. When two files land on the same key the one later in
    /// scan order wins.
    pub fn build_file_tree(&self, source: &DataSource) -> NwpResult<FileTree> {
        let files = self.all_data_files(source)?;
        let mut tree = FileTree::new();
        let mut skipped = 0usize;

        for file in files {
            let descriptor = match FilenameCodec::decode(&file) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    debug!(source = %source.id(), file = %file.display(), error = %e, "Skipping file");
                    skipped += 1;
                    continue;
                }
            };

            if descriptor.source_grid != source.source_grid()
                || descriptor.model_tag != source.model_tag()
            {
                debug!(
                    source = %source.id(),
                    file = %file.display(),
                    grid = %descriptor.source_grid,
                    model = %descriptor.model_tag,
                    "Skipping file from another grid or model"
                );
                skipped += 1;
                continue;
            }

            if let Some(previous) = tree.insert(&descriptor, file.clone()) {
                debug!(
                    source = %source.id(),
                    kept = %file.display(),
                    replaced = %previous.display(),
                    "Duplicate file key, later file wins"
                );
            }
        }

        debug!(source = %source.id(), files = tree.len(), skipped, "Built file tree");
        Ok(tree)
    }

    /// Distinct init times present in `source`, ascending.
    pub fn init_times(&self, source: &DataSource) -> NwpResult<Vec<DateTime<Utc>>> {
        Ok(self.build_file_tree(source)?.init_times())
    }
}
