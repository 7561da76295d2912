//! Filename codec for NWP output files.
//!
//! Filenames follow
//! `{YYYYMMDD}_{HH}_{modelTag}.{tag}.{sourceGrid}.{leadHours:03}.{level}.nc`,
//! e.g. `20121017_12_ecmwf_forecast.P_derived.EUR_LL015.036.ml.nc`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use nwp_common::time::{format_init_token, is_whole_hour, parse_init_token};
use nwp_common::{lead_time_hours, Fingerprint, LevelType, NwpError, NwpResult, MAX_LEAD_HOURS};
use serde::Serialize;

use crate::variables::{file_tag, variable_for_tag};

/// File extension of every indexed file.
pub const EXTENSION: &str = "nc";

/// Decoded identity of one file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// Variable or bundle tag (`T`, `P_derived`, `PRESSURE_LEVELS`, ...)
    pub tag: String,
    pub level: LevelType,
    /// Model run time
    pub init_time: DateTime<Utc>,
    /// Forecast lead in whole hours
    pub lead_hours: u32,
    /// Grid identifier (e.g. `EUR_LL015`)
    pub source_grid: String,
    /// Model/product tag (e.g. `ecmwf_forecast`)
    pub model_tag: String,
    /// Path the descriptor was decoded from
    pub path: PathBuf,
}

impl FileDescriptor {
    pub fn lead_time(&self) -> Duration {
        Duration::hours(self.lead_hours as i64)
    }

    pub fn valid_time(&self) -> DateTime<Utc> {
        nwp_common::time::valid_time(self.init_time, self.lead_hours)
    }

    /// CF standard name, when the tag names a single variable.
    pub fn variable(&self) -> Option<&'static str> {
        variable_for_tag(&self.tag)
    }

    /// Re-encode the filename this descriptor describes.
    pub fn file_name(&self) -> String {
        render(
            self.init_time,
            &self.model_tag,
            &self.tag,
            &self.source_grid,
            self.lead_hours,
            self.level,
        )
    }
}

/// Encoder bound to one model tag and source grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameCodec {
    model_tag: String,
    source_grid: String,
}

impl FilenameCodec {
    pub fn new(model_tag: impl Into<String>, source_grid: impl Into<String>) -> Self {
        Self {
            model_tag: model_tag.into(),
            source_grid: source_grid.into(),
        }
    }

    pub fn model_tag(&self) -> &str {
        &self.model_tag
    }

    pub fn source_grid(&self) -> &str {
        &self.source_grid
    }

    /// Filename holding `variable` on `level` for the given init and valid time.
    ///
    /// The lead time is `valid - init` rounded to whole hours and must lie in
    /// `0..=999`.
    pub fn encode(
        &self,
        variable: &str,
        level: LevelType,
        init_time: DateTime<Utc>,
        valid_time: DateTime<Utc>,
    ) -> NwpResult<String> {
        let lead = lead_time_hours(init_time, valid_time)?;
        self.encode_tag(&file_tag(variable, level), level, init_time, lead)
    }

    /// Filename for an already resolved tag and lead time.
    pub fn encode_tag(
        &self,
        tag: &str,
        level: LevelType,
        init_time: DateTime<Utc>,
        lead_hours: u32,
    ) -> NwpResult<String> {
        if lead_hours > MAX_LEAD_HOURS {
            return Err(NwpError::LeadTimeOutOfRange(lead_hours as i64));
        }
        if !is_whole_hour(init_time) {
            return Err(NwpError::malformed(
                init_time.to_rfc3339(),
                "initialization time must fall on a whole hour",
            ));
        }
        for (what, field) in [
            ("tag", tag),
            ("source grid", self.source_grid.as_str()),
            ("model tag", self.model_tag.as_str()),
        ] {
            if field.is_empty() || field.contains('.') || field.contains('/') {
                return Err(NwpError::malformed(
                    field,
                    format!("{} must be non-empty without '.' or '/'", what),
                ));
            }
        }

        Ok(render(
            init_time,
            &self.model_tag,
            tag,
            &self.source_grid,
            lead_hours,
            level,
        ))
    }

    /// Decode the final component of `path`.
    pub fn decode(path: impl AsRef<Path>) -> NwpResult<FileDescriptor> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| NwpError::malformed(path.display().to_string(), "no UTF-8 file name"))?;

        let fields: Vec<&str> = name.split('.').collect();
        let [prefix, tag, grid, lead, level, ext] = fields.as_slice() else {
            return Err(NwpError::malformed(
                name,
                format!("expected 6 dot-separated fields, found {}", fields.len()),
            ));
        };

        if *ext != EXTENSION {
            return Err(NwpError::malformed(name, format!("unexpected extension '{}'", ext)));
        }

        let mut prefix_parts = prefix.splitn(3, '_');
        let (Some(date), Some(hour), Some(model_tag)) =
            (prefix_parts.next(), prefix_parts.next(), prefix_parts.next())
        else {
            return Err(NwpError::malformed(name, "prefix is not YYYYMMDD_HH_<model>"));
        };
        let init_time = parse_init_token(date, hour)
            .ok_or_else(|| NwpError::malformed(name, "invalid initialization date/hour"))?;

        if model_tag.is_empty() || tag.is_empty() || grid.is_empty() {
            return Err(NwpError::malformed(name, "empty model, tag or grid field"));
        }

        if lead.len() != 3 || !lead.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NwpError::malformed(name, "lead time is not a 3-digit number"));
        }
        let lead_hours: u32 = lead
            .parse()
            .map_err(|_| NwpError::malformed(name, "lead time is not a 3-digit number"))?;

        let level: LevelType = level
            .parse()
            .map_err(|_| NwpError::malformed(name, format!("unknown level type '{}'", level)))?;

        Ok(FileDescriptor {
            tag: tag.to_string(),
            level,
            init_time,
            lead_hours,
            source_grid: grid.to_string(),
            model_tag: model_tag.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Cache key for `path`.
    pub fn fingerprint(path: impl AsRef<Path>) -> Fingerprint {
        Fingerprint::from_path(path)
    }
}

fn render(
    init_time: DateTime<Utc>,
    model_tag: &str,
    tag: &str,
    source_grid: &str,
    lead_hours: u32,
    level: LevelType,
) -> String {
    format!(
        "{}_{}.{}.{}.{:03}.{}.{}",
        format_init_token(init_time),
        model_tag,
        tag,
        source_grid,
        lead_hours,
        level,
        EXTENSION
    )
}
