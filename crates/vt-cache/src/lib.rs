//! Validity-time cache for NWP files.
//!
//! Opening a forecast dataset just to read its time coordinate is slow, so
//! the list of valid times of every file is kept in a small record on disk,
//! keyed by a fingerprint of the file's path.
//!
//! - [`ValidTimeCache`]: lookup/save with staleness checks
//! - [`CacheJanitor`]: age-based sweeping of the record directory
//! - [`CacheConfig`]: cache directory and age thresholds

pub mod config;
pub mod entry;
pub mod janitor;
pub mod store;

pub use config::{max_age_duration, CacheConfig};
pub use entry::ValidTimeCacheEntry;
pub use janitor::{CacheJanitor, JanitorStats};
pub use store::{ValidTimeCache, CACHE_FILE_SUFFIX};
