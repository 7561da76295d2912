//! Common test fixtures for NWP index and cache tests.
//!
//! The demo set mirrors a single ECMWF run on the `EUR_LL015` grid.

/// Demo data source identity.
pub mod source {
    /// Grid identifier used by the demo files
    pub const GRID: &str = "EUR_LL015";

    /// Model tag used by the demo files
    pub const MODEL_TAG: &str = "ecmwf_forecast";

    /// Data source id
    pub const ID: &str = "ecmwf_EUR_LL015";
}

/// Common time values for testing.
pub mod time {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Lead time of every demo file, in hours
    pub const DEMO_LEAD_HOURS: u32 = 36;

    /// Init time of the demo run (2012-10-17T12:00:00Z)
    pub fn demo_init_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2012, 10, 17, 12, 0, 0).unwrap()
    }

    /// Valid time of the demo files
    pub fn demo_valid_time() -> DateTime<Utc> {
        demo_init_time() + Duration::hours(DEMO_LEAD_HOURS as i64)
    }

    /// Hourly valid times `init..=init+hours`
    pub fn hourly_valid_times(hours: u32) -> Vec<DateTime<Utc>> {
        (0..=hours)
            .map(|h| demo_init_time() + Duration::hours(h as i64))
            .collect()
    }
}

/// Demo filenames.
pub mod files {
    /// `(tag, filename)` for every file of the demo run
    pub const DEMO_FILES: [(&str, &str); 9] = [
        ("CC", "20121017_12_ecmwf_forecast.CC.EUR_LL015.036.ml.nc"),
        ("PRESSURE_LEVELS", "20121017_12_ecmwf_forecast.PRESSURE_LEVELS.EUR_LL015.036.pl.nc"),
        ("P_derived", "20121017_12_ecmwf_forecast.P_derived.EUR_LL015.036.ml.nc"),
        ("Q", "20121017_12_ecmwf_forecast.Q.EUR_LL015.036.ml.nc"),
        ("SFC", "20121017_12_ecmwf_forecast.SFC.EUR_LL015.036.sfc.nc"),
        ("T", "20121017_12_ecmwf_forecast.T.EUR_LL015.036.ml.nc"),
        ("U", "20121017_12_ecmwf_forecast.U.EUR_LL015.036.ml.nc"),
        ("V", "20121017_12_ecmwf_forecast.V.EUR_LL015.036.ml.nc"),
        ("W", "20121017_12_ecmwf_forecast.W.EUR_LL015.036.ml.nc"),
    ];

    /// The air pressure file used by most cache tests
    pub const AIR_PRESSURE_ML: &str = "20121017_12_ecmwf_forecast.P_derived.EUR_LL015.036.ml.nc";

    /// Files that share the data directory but are not model output
    pub const STRAY_FILES: [&str; 3] = ["README.txt", ".DS_Store", "20121017_12_notes.nc"];
}
