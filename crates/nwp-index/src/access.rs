//! Data-access facade used by the serving layer.
//!
//! Answers "which file holds variable V on level kind L for run I at valid
//! time T" and "which valid times does run I provide for V", consulting the
//! validity-time cache before falling back to the dataset reader.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nwp_common::{LevelType, NwpResult};
use serde::Serialize;
use tracing::{debug, warn};
use vt_cache::{CacheJanitor, JanitorStats, ValidTimeCache};

use crate::codec::FilenameCodec;
use crate::indexer::FileTreeIndexer;
use crate::source::DataSource;
use crate::tree::FileTree;
use crate::variables::file_tag;

/// Reads the time coordinate of a dataset.
///
/// Implemented by the binary dataset reader; only called on cache misses.
pub trait ValidTimeExtractor {
    /// `(init time, valid times)` of the dataset at `path`.
    fn extract_valid_times(&self, path: &Path) -> NwpResult<(DateTime<Utc>, Vec<DateTime<Utc>>)>;
}

impl<F> ValidTimeExtractor for F
where
    F: Fn(&Path) -> NwpResult<(DateTime<Utc>, Vec<DateTime<Utc>>)>,
{
    fn extract_valid_times(&self, path: &Path) -> NwpResult<(DateTime<Utc>, Vec<DateTime<Utc>>)> {
        self(path)
    }
}

/// Options the dataset reader needs when opening several files of a source
/// as one aggregated dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetOpenOptions {
    /// Dimensions whose coordinates may differ between files
    pub skip_dim_check: Vec<String>,
}

impl Default for DatasetOpenOptions {
    fn default() -> Self {
        Self {
            skip_dim_check: vec!["lon".to_string()],
        }
    }
}

/// Index and cache access for one data source.
#[derive(Debug, Clone)]
pub struct NwpDataAccess {
    source: DataSource,
    indexer: FileTreeIndexer,
    cache: Arc<ValidTimeCache>,
}

impl NwpDataAccess {
    pub fn new(source: DataSource, cache: Arc<ValidTimeCache>) -> Self {
        Self::with_indexer(source, FileTreeIndexer::default(), cache)
    }

    pub fn with_indexer(source: DataSource, indexer: FileTreeIndexer, cache: Arc<ValidTimeCache>) -> Self {
        Self {
            source,
            indexer,
            cache,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn cache(&self) -> &Arc<ValidTimeCache> {
        &self.cache
    }

    /// Root directory of the data source.
    pub fn datapath(&self) -> &Path {
        self.source.root()
    }

    /// Filename (without directory) for a variable, level, run and valid time.
    pub fn filename(
        &self,
        variable: &str,
        level: LevelType,
        init_time: DateTime<Utc>,
        valid_time: DateTime<Utc>,
    ) -> NwpResult<String> {
        self.source.codec().encode(variable, level, init_time, valid_time)
    }

    /// Like [`filename`](Self::filename), joined to the data source root.
    pub fn full_path(
        &self,
        variable: &str,
        level: LevelType,
        init_time: DateTime<Utc>,
        valid_time: DateTime<Utc>,
    ) -> NwpResult<PathBuf> {
        self.source.filename_path(variable, level, init_time, valid_time)
    }

    pub fn all_data_files(&self) -> NwpResult<Vec<PathBuf>> {
        self.indexer.all_data_files(&self.source)
    }

    pub fn build_file_tree(&self) -> NwpResult<FileTree> {
        self.indexer.build_file_tree(&self.source)
    }

    pub fn init_times(&self) -> NwpResult<Vec<DateTime<Utc>>> {
        self.indexer.init_times(&self.source)
    }

    pub fn dataset_open_options(&self) -> DatasetOpenOptions {
        DatasetOpenOptions::default()
    }

    /// Valid times available for `variable` on `level` in run `init_time`.
    ///
    /// Each file of the run is served from the cache when possible; on a
    /// miss `extractor` reads the file and the result is cached. Files that
    /// cannot be read are skipped.
    pub fn valid_times(
        &self,
        variable: &str,
        level: LevelType,
        init_time: DateTime<Utc>,
        extractor: &dyn ValidTimeExtractor,
    ) -> NwpResult<Vec<DateTime<Utc>>> {
        let tree = self.build_file_tree()?;
        let tag = file_tag(variable, level);
        let mut times = Vec::new();

        for (lead, relative) in tree.files_for_tag(init_time, &tag) {
            match FilenameCodec::decode(relative) {
                Ok(descriptor) if descriptor.level == level => {}
                _ => {
                    debug!(file = %relative.display(), lead, "Tag present on a different level");
                    continue;
                }
            }

            let path = self.source.root().join(relative);
            if let Some(entry) = self.cache.lookup(&path) {
                times.extend(entry.valid_times);
                continue;
            }

            let (file_init, file_times) = match extractor.extract_valid_times(&path) {
                Ok(result) => result,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to read valid times");
                    continue;
                }
            };
            if file_init != init_time {
                warn!(
                    file = %path.display(),
                    expected = %init_time,
                    found = %file_init,
                    "Dataset init time differs from filename"
                );
            }

            if let Err(e) = self.cache.save(&path, file_init, file_times.clone()) {
                warn!(file = %path.display(), error = %e, "Failed to cache valid times");
            }
            times.extend(file_times);
        }

        times.sort();
        times.dedup();
        Ok(times)
    }

    /// Delete cache records older than `max_age_seconds` (`0` purges all).
    pub fn service_cache(&self, max_age_seconds: u64) -> NwpResult<JanitorStats> {
        CacheJanitor::new(Arc::clone(&self.cache)).service_cache(max_age_seconds)
    }
}
