//! Stable one-way fingerprints of file paths, used as cache keys.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a normalized absolute path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint of `path` after [`normalize_path`].
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let normalized = normalize_path(path.as_ref());
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_os_str().as_encoded_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Make `path` absolute and fold `.`/`..` components lexically.
///
/// Does not touch the filesystem, so symlinks are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_stable_across_calls() {
        let a = Fingerprint::from_path("/data/20121017_12_ecmwf_forecast.T.EUR_LL015.036.ml.nc");
        let b = Fingerprint::from_path("/data/20121017_12_ecmwf_forecast.T.EUR_LL015.036.ml.nc");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[cfg(unix)]
    #[test]
    fn test_known_digest() {
        // Pinned so a change of hash or normalization shows up here.
        assert_eq!(
            Fingerprint::from_path("/data/20121017_12_ecmwf_forecast.P_derived.EUR_LL015.036.ml.nc")
                .as_str(),
            "bdb58c1ffd883d83dcfff83597eae77f8110e775f3304c811fa71953a503f00b"
        );
        assert_eq!(
            Fingerprint::from_path("/a").to_string(),
            "6a50dc8584134c7de537c0052ff6d236bf874355e050c90523e0c5ff2a543a28"
        );
    }

    #[test]
    fn test_normalization() {
        assert_eq!(
            Fingerprint::from_path("/data/./x/../file.nc"),
            Fingerprint::from_path("/data/file.nc")
        );
        let relative = Fingerprint::from_path("file.nc");
        let absolute = Fingerprint::from_path(std::env::current_dir().unwrap().join("file.nc"));
        assert_eq!(relative, absolute);
    }

    #[test]
    fn test_distinct_paths_distinct_fingerprints() {
        let tags = ["CC", "PRESSURE_LEVELS", "P_derived", "Q", "SFC", "T", "U", "V", "W"];
        let mut seen = HashSet::new();
        for tag in tags {
            for lead in [0, 6, 12, 36, 999] {
                let path = format!("/data/20121017_12_ecmwf_forecast.{}.EUR_LL015.{:03}.ml.nc", tag, lead);
                assert!(seen.insert(Fingerprint::from_path(&path)), "collision for {}", path);
            }
        }
    }
}
