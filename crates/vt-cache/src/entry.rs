//! Persisted cache record.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Valid times extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidTimeCacheEntry {
    /// Normalized path of the source file
    pub source_path: PathBuf,
    /// Init time of the file when it was cached
    pub init_time: DateTime<Utc>,
    /// Ascending, de-duplicated valid times
    pub valid_times: Vec<DateTime<Utc>>,
    /// When the record was written
    pub created_at: DateTime<Utc>,
}

impl ValidTimeCacheEntry {
    pub fn new(
        source_path: PathBuf,
        init_time: DateTime<Utc>,
        mut valid_times: Vec<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        valid_times.sort();
        valid_times.dedup();
        Self {
            source_path,
            init_time,
            valid_times,
            created_at,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Whether the record has outlived `max_age`. A zero `max_age` expires everything.
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        max_age <= Duration::zero() || self.age(now) > max_age
    }
}
