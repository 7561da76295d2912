//! Age-based sweeping of the validity-time cache directory.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use nwp_common::{NwpError, NwpResult};
use serde::Serialize;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::config::max_age_duration;
use crate::store::ValidTimeCache;

/// Statistics from one sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct JanitorStats {
    /// Record files examined
    pub scanned: u64,
    /// Records deleted for exceeding the age limit
    pub deleted: u64,
    /// Unreadable records deleted
    pub corrupt_deleted: u64,
    /// Records that could not be read or deleted
    pub delete_errors: u64,
}

/// Deletes cache records older than a maximum age.
#[derive(Debug, Clone)]
pub struct CacheJanitor {
    cache: Arc<ValidTimeCache>,
}

impl CacheJanitor {
    pub fn new(cache: Arc<ValidTimeCache>) -> Self {
        Self { cache }
    }

    /// Delete every record older than `max_age_seconds`; `0` deletes all.
    ///
    /// Corrupt records are always deleted. Records removed concurrently by
    /// another process are skipped.
    pub fn service_cache(&self, max_age_seconds: u64) -> NwpResult<JanitorStats> {
        let max_age = max_age_duration(max_age_seconds);
        let now = self.cache.now();
        let mut stats = JanitorStats::default();

        for record in self.cache.entry_files()? {
            stats.scanned += 1;

            let corrupt = match self.cache.read_record(&record) {
                Ok(Some(entry)) => {
                    if !entry.is_expired(max_age, now) {
                        continue;
                    }
                    false
                }
                Ok(None) => continue,
                Err(NwpError::CacheCorrupt { reason, .. }) => {
                    warn!(record = %record.display(), reason = %reason, "Deleting corrupt cache record");
                    true
                }
                Err(e) => {
                    warn!(record = %record.display(), error = %e, "Failed to read cache record");
                    stats.delete_errors += 1;
                    continue;
                }
            };

            match self.cache.remove_record(&record) {
                Ok(true) if corrupt => stats.corrupt_deleted += 1,
                Ok(true) => stats.deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(record = %record.display(), error = %e, "Failed to delete cache record");
                    stats.delete_errors += 1;
                }
            }
        }

        info!(
            max_age_seconds,
            scanned = stats.scanned,
            deleted = stats.deleted,
            corrupt = stats.corrupt_deleted,
            delete_errors = stats.delete_errors,
            "Cache janitor sweep complete"
        );

        Ok(stats)
    }

    /// One sweep with the configured maximum age.
    pub fn run_once(&self) -> NwpResult<JanitorStats> {
        self.service_cache(self.cache.config().max_age_seconds)
    }

    /// Sweep every `period`, starting immediately. Failed sweeps are logged
    /// and the loop carries on.
    pub async fn run_forever(self, period: StdDuration) {
        let period = period.max(StdDuration::from_millis(1));
        info!(interval_secs = period.as_secs(), "Starting cache janitor task");

        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            let janitor = self.clone();
            match tokio::task::spawn_blocking(move || janitor.run_once()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => error!(error = %e, "Cache janitor sweep failed"),
                Err(e) => error!(error = %e, "Cache janitor sweep panicked"),
            }
        }
    }
}
