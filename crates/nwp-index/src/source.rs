//! Configured NWP output collections.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nwp_common::{LevelType, NwpError, NwpResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::FilenameCodec;

/// Model tag used when a source does not configure one.
pub const DEFAULT_MODEL_TAG: &str = "ecmwf_forecast";

/// One configured collection of model output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    id: String,
    root: PathBuf,
    source_grid: String,
    model_tag: String,
    recursive: bool,
}

impl DataSource {
    /// Flat (non-recursive) source using the default model tag.
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>, source_grid: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
            source_grid: source_grid.into(),
            model_tag: DEFAULT_MODEL_TAG.to_string(),
            recursive: false,
        }
    }

    pub fn with_model_tag(mut self, model_tag: impl Into<String>) -> Self {
        self.model_tag = model_tag.into();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_grid(&self) -> &str {
        &self.source_grid
    }

    pub fn model_tag(&self) -> &str {
        &self.model_tag
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn codec(&self) -> FilenameCodec {
        FilenameCodec::new(&self.model_tag, &self.source_grid)
    }

    /// Full path of the file holding `variable` on `level` for a run and valid time.
    pub fn filename_path(
        &self,
        variable: &str,
        level: LevelType,
        init_time: DateTime<Utc>,
        valid_time: DateTime<Utc>,
    ) -> NwpResult<PathBuf> {
        let name = self.codec().encode(variable, level, init_time, valid_time)?;
        Ok(self.root.join(name))
    }
}

/// YAML representation of a data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub root: PathBuf,
    pub source_grid: String,
    #[serde(default = "default_model_tag")]
    pub model_tag: String,
    #[serde(default)]
    pub recursive: bool,
}

fn default_model_tag() -> String {
    DEFAULT_MODEL_TAG.to_string()
}

impl From<SourceConfig> for DataSource {
    fn from(config: SourceConfig) -> Self {
        DataSource::new(config.id, config.root, config.source_grid)
            .with_model_tag(config.model_tag)
            .with_recursive(config.recursive)
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    sources: Vec<SourceConfig>,
}

/// Parse a `sources:` list from YAML text.
pub fn parse_sources(yaml: &str) -> NwpResult<Vec<DataSource>> {
    let file: SourcesFile = serde_yaml::from_str(yaml)
        .map_err(|e| NwpError::InvalidConfig(format!("sources YAML: {}", e)))?;

    let mut seen = std::collections::HashSet::new();
    for source in &file.sources {
        if !seen.insert(source.id.as_str()) {
            return Err(NwpError::InvalidConfig(format!(
                "duplicate data source id '{}'",
                source.id
            )));
        }
    }

    Ok(file.sources.into_iter().map(DataSource::from).collect())
}

/// Load data sources from a YAML file.
pub fn load_sources(path: impl AsRef<Path>) -> NwpResult<Vec<DataSource>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        NwpError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
    })?;
    let sources = parse_sources(&contents)?;
    info!(path = %path.display(), count = sources.len(), "Loaded data sources");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_filename_path() {
        let source = DataSource::new("ecmwf_EUR_LL015", "/data/mss", "EUR_LL015");
        let init = Utc.with_ymd_and_hms(2012, 10, 17, 12, 0, 0).unwrap();
        let path = source
            .filename_path("air_pressure", LevelType::ModelLevel, init, init + Duration::hours(36))
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/data/mss/20121017_12_ecmwf_forecast.P_derived.EUR_LL015.036.ml.nc")
        );
    }

    #[test]
    fn test_parse_sources() {
        let yaml = r#"
sources:
  - id: ecmwf_EUR_LL015
    root: /data/ecmwf
    source_grid: EUR_LL015
  - id: ecmwf_NH_LL030
    root: /data/nh
    source_grid: NH_LL030
    model_tag: ecmwf_analysis
    recursive: true
"#;
        let sources = parse_sources(yaml).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].model_tag(), DEFAULT_MODEL_TAG);
        assert!(!sources[0].recursive());
        assert_eq!(sources[1].root(), Path::new("/data/nh"));
        assert_eq!(sources[1].model_tag(), "ecmwf_analysis");
        assert!(sources[1].recursive());
    }

    #[test]
    fn test_parse_sources_rejects_duplicates() {
        let yaml = r#"
sources:
  - { id: a, root: /x, source_grid: G }
  - { id: a, root: /y, source_grid: G }
"#;
        assert!(matches!(parse_sources(yaml), Err(NwpError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_sources_missing_file() {
        assert!(load_sources("/nonexistent/sources.yaml").is_err());
    }
}
