//! Disk-backed store of [`ValidTimeCacheEntry`] records.
//!
//! One JSON record per source file, named by the path fingerprint. Records
//! are written to a temporary file in the cache directory and renamed into
//! place, so readers only ever see complete records.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nwp_common::{
    normalize_path, Clock, FileSystem, Fingerprint, LocalFileSystem, NwpError, NwpResult,
    SystemClock,
};
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::entry::ValidTimeCacheEntry;

/// Suffix of every record file in the cache directory.
pub const CACHE_FILE_SUFFIX: &str = "_vt_cache_pickle";

/// Validity-time cache.
///
/// Safe to share between threads; concurrent saves of the same key leave
/// one complete record behind.
pub struct ValidTimeCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    fs: Arc<dyn FileSystem>,
}

impl ValidTimeCache {
    /// Cache using the system clock and the local filesystem.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(LocalFileSystem))
    }

    /// Cache with an injected clock and filesystem (used for source mtimes).
    pub fn with_parts(config: CacheConfig, clock: Arc<dyn Clock>, fs: Arc<dyn FileSystem>) -> Self {
        Self { config, clock, fs }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Record file that holds (or would hold) the entry for `path`.
    pub fn cache_file_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.record_path(&Fingerprint::from_path(path))
    }

    fn record_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}{}", fingerprint, CACHE_FILE_SUFFIX))
    }

    /// Cached entry for `path`, or `None` on a miss, a stale entry or an
    /// unreadable record. Never modifies the store.
    pub fn lookup(&self, path: impl AsRef<Path>) -> Option<ValidTimeCacheEntry> {
        let source = normalize_path(path.as_ref());
        let record = self.record_path(&Fingerprint::from_path(&source));

        let entry = match self.read_record(&record) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!(path = %source.display(), "Valid-time cache miss");
                return None;
            }
            // Left in place: the caller's save overwrites it, the janitor
            // deletes it otherwise.
            Err(e @ NwpError::CacheCorrupt { .. }) => {
                warn!(record = %record.display(), error = %e, "Ignoring corrupt cache record");
                return None;
            }
            Err(e) => {
                warn!(record = %record.display(), error = %e, "Failed to read cache record");
                return None;
            }
        };

        if entry.source_path != source {
            debug!(
                path = %source.display(),
                cached = %entry.source_path.display(),
                "Cache record belongs to another path"
            );
            return None;
        }

        if self.is_stale(&entry, &source) {
            debug!(path = %source.display(), created_at = %entry.created_at, "Stale cache entry");
            return None;
        }

        Some(entry)
    }

    fn is_stale(&self, entry: &ValidTimeCacheEntry, source: &Path) -> bool {
        if entry.is_expired(self.config.max_age(), self.clock.now()) {
            return true;
        }
        match self.fs.modified(source) {
            Ok(modified) => modified > entry.created_at,
            // Without metadata only the age rule applies.
            Err(_) => false,
        }
    }

    /// Write (or overwrite) the entry for `path`, stamped with the current time.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        init_time: DateTime<Utc>,
        valid_times: Vec<DateTime<Utc>>,
    ) -> NwpResult<ValidTimeCacheEntry> {
        let source = normalize_path(path.as_ref());
        let entry = ValidTimeCacheEntry::new(source, init_time, valid_times, self.clock.now());
        let record = self.record_path(&Fingerprint::from_path(&entry.source_path));

        let dir = self.cache_dir();
        fs::create_dir_all(dir).map_err(|e| NwpError::CacheUnavailable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let bytes = serde_json::to_vec(&entry).map_err(|e| NwpError::CacheCorrupt {
            path: record.clone(),
            reason: e.to_string(),
        })?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".vt_")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&record).map_err(|e| NwpError::Io(e.error))?;

        debug!(
            path = %entry.source_path.display(),
            record = %record.display(),
            valid_times = entry.valid_times.len(),
            "Saved valid-time cache entry"
        );
        Ok(entry)
    }

    /// Delete the entry for `path`. Returns whether a record was removed.
    pub fn remove(&self, path: impl AsRef<Path>) -> NwpResult<bool> {
        self.remove_record(&self.cache_file_path(path))
    }

    /// All record files currently in the cache directory, sorted.
    ///
    /// A cache directory that does not exist yet holds no records.
    pub fn entry_files(&self) -> NwpResult<Vec<PathBuf>> {
        let dir = self.cache_dir();
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(NwpError::CacheUnavailable {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_record_file(path))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Number of records in the store.
    pub fn len(&self) -> NwpResult<usize> {
        Ok(self.entry_files()?.len())
    }

    pub fn is_empty(&self) -> NwpResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Read one record file. `Ok(None)` if it does not exist (any more).
    pub(crate) fn read_record(&self, record: &Path) -> NwpResult<Option<ValidTimeCacheEntry>> {
        let bytes = match fs::read(record) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| NwpError::CacheCorrupt {
                path: record.to_path_buf(),
                reason: e.to_string(),
            })
    }

    pub(crate) fn remove_record(&self, record: &Path) -> NwpResult<bool> {
        match fs::remove_file(record) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for ValidTimeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidTimeCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn is_record_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(CACHE_FILE_SUFFIX))
}
