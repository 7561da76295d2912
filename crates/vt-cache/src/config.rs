//! Cache configuration.

use std::env;
use std::path::{Path, PathBuf};

use chrono::Duration;
use nwp_common::{NwpError, NwpResult};
use serde::{Deserialize, Serialize};

/// Where cache records live and how long they stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one record file per cached source file
    pub cache_dir: PathBuf,

    /// Records older than this are stale; 0 invalidates everything
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,

    /// Period of the background janitor
    #[serde(default = "default_janitor_interval_secs")]
    pub janitor_interval_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    env::temp_dir().join("nwp_vt_cache")
}

fn default_max_age_seconds() -> u64 {
    14 * 24 * 3600 // two weeks
}

fn default_janitor_interval_secs() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            max_age_seconds: default_max_age_seconds(),
            janitor_interval_secs: default_janitor_interval_secs(),
        }
    }
}

impl CacheConfig {
    pub fn new(cache_dir: impl Into<PathBuf>, max_age_seconds: u64) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            max_age_seconds,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cache_dir = env::var("VALID_TIME_CACHE_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);

        let max_age_seconds = env::var("VALID_TIME_CACHE_MAX_AGE_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_age_seconds);

        let janitor_interval_secs = env::var("VALID_TIME_CACHE_JANITOR_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.janitor_interval_secs);

        Self {
            cache_dir,
            max_age_seconds,
            janitor_interval_secs,
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> NwpResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NwpError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> NwpResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| NwpError::InvalidConfig(format!("cache YAML: {}", e)))
    }

    pub fn max_age(&self) -> Duration {
        max_age_duration(self.max_age_seconds)
    }
}

/// Age limit as a chrono duration. Values beyond what chrono can represent
/// saturate to [`Duration::MAX`].
pub fn max_age_duration(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_defaults() {
        let config = CacheConfig::from_yaml_str("cache_dir: /var/cache/vt\n").unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/vt"));
        assert_eq!(config.max_age_seconds, 14 * 24 * 3600);
        assert_eq!(config.janitor_interval_secs, 3600);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = "cache_dir: /tmp/vt\nmax_age_seconds: 0\njanitor_interval_secs: 60\n";
        let config = CacheConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_age_seconds, 0);
        assert_eq!(config.max_age(), Duration::zero());
        assert_eq!(config.janitor_interval_secs, 60);
    }

    #[test]
    fn test_huge_max_age_saturates() {
        assert_eq!(max_age_duration(u64::MAX), Duration::MAX);
        assert_eq!(max_age_duration(i64::MAX as u64), Duration::MAX);
        assert_eq!(max_age_duration(90), Duration::seconds(90));

        let yaml = "cache_dir: /tmp/vt\nmax_age_seconds: 18446744073709551615\n";
        let config = CacheConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_age(), Duration::MAX);
    }

    #[test]
    fn test_yaml_requires_cache_dir() {
        assert!(matches!(
            CacheConfig::from_yaml_str("max_age_seconds: 10\n"),
            Err(NwpError::InvalidConfig(_))
        ));
    }
}
