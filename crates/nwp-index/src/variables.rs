//! Mapping between CF standard names and the short tags used in filenames.
//!
//! Model-level files hold one variable each and are tagged with the
//! variable's short name. Pressure-level and surface files bundle all
//! variables of that level kind under a single tag.

use nwp_common::LevelType;

/// Tag shared by all pressure-level files.
pub const PRESSURE_LEVELS_TAG: &str = "PRESSURE_LEVELS";

/// Tag shared by all surface files.
pub const SURFACE_TAG: &str = "SFC";

/// CF standard name -> filename tag for per-variable files.
const VARIABLE_TAGS: &[(&str, &str)] = &[
    ("air_pressure", "P_derived"),
    ("air_temperature", "T"),
    ("eastward_wind", "U"),
    ("northward_wind", "V"),
    ("lagrangian_tendency_of_air_pressure", "W"),
    ("specific_humidity", "Q"),
    ("cloud_area_fraction_in_atmosphere_layer", "CC"),
];

/// Tag used for bundled files of this level kind, if any.
pub fn level_tag(level: LevelType) -> Option<&'static str> {
    match level {
        LevelType::PressureLevel => Some(PRESSURE_LEVELS_TAG),
        LevelType::Surface => Some(SURFACE_TAG),
        _ => None,
    }
}

/// Filename tag for `variable` on `level`.
///
/// Unknown variable names are taken to already be a tag.
pub fn file_tag(variable: &str, level: LevelType) -> String {
    if let Some(tag) = level_tag(level) {
        return tag.to_string();
    }
    VARIABLE_TAGS
        .iter()
        .find(|(name, _)| *name == variable)
        .map(|(_, tag)| tag.to_string())
        .unwrap_or_else(|| variable.to_string())
}

/// CF standard name for a per-variable tag.
pub fn variable_for_tag(tag: &str) -> Option<&'static str> {
    VARIABLE_TAGS
        .iter()
        .find(|(_, t)| *t == tag)
        .map(|(name, _)| *name)
}
