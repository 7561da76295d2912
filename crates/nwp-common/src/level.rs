//! Vertical coordinate kinds used in NWP output filenames.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NwpError;

/// Level-type tag carried as the last field before the `.nc` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelType {
    /// Native hybrid model levels
    #[serde(rename = "ml")]
    ModelLevel,
    /// Isobaric levels
    #[serde(rename = "pl")]
    PressureLevel,
    /// Potential vorticity surfaces
    #[serde(rename = "pv")]
    PotentialVorticity,
    /// Isentropic (potential temperature) levels
    #[serde(rename = "tl")]
    PotentialTemperature,
    /// Altitude levels
    #[serde(rename = "al")]
    Altitude,
    /// Single-level surface fields
    #[serde(rename = "sfc")]
    Surface,
}

impl LevelType {
    pub const ALL: [LevelType; 6] = [
        LevelType::ModelLevel,
        LevelType::PressureLevel,
        LevelType::PotentialVorticity,
        LevelType::PotentialTemperature,
        LevelType::Altitude,
        LevelType::Surface,
    ];

    /// Short suffix as it appears in filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelType::ModelLevel => "ml",
            LevelType::PressureLevel => "pl",
            LevelType::PotentialVorticity => "pv",
            LevelType::PotentialTemperature => "tl",
            LevelType::Altitude => "al",
            LevelType::Surface => "sfc",
        }
    }
}

impl fmt::Display for LevelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelType {
    type Err = NwpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LevelType::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| NwpError::malformed(s, "unknown level type"))
    }
}
