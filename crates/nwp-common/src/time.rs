//! Time handling utilities for forecast lead times and init-time tokens.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::{NwpError, NwpResult};

/// Largest lead time expressible in the three-digit filename field.
pub const MAX_LEAD_HOURS: u32 = 999;

/// Format used for the `{initDate}_{initHour}` filename prefix.
pub const INIT_TOKEN_FORMAT: &str = "%Y%m%d_%H";

/// Lead time between `init` and `valid`, rounded to the nearest whole hour.
pub fn lead_time_hours(init: DateTime<Utc>, valid: DateTime<Utc>) -> NwpResult<u32> {
    let seconds = (valid - init).num_seconds();
    // Half hours round away from the init time.
    let hours = (seconds + 1800).div_euclid(3600);
    if hours < 0 || hours > MAX_LEAD_HOURS as i64 {
        return Err(NwpError::LeadTimeOutOfRange(hours));
    }
    Ok(hours as u32)
}

/// Valid time for a given init time and lead.
pub fn valid_time(init: DateTime<Utc>, lead_hours: u32) -> DateTime<Utc> {
    init + Duration::hours(lead_hours as i64)
}

/// Whether `t` sits exactly on a whole hour.
pub fn is_whole_hour(t: DateTime<Utc>) -> bool {
    t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0
}

/// Render the `YYYYMMDD_HH` filename token.
pub fn format_init_token(init: DateTime<Utc>) -> String {
    init.format(INIT_TOKEN_FORMAT).to_string()
}

/// Parse a `YYYYMMDD` date and `HH` hour pair into an init time.
pub fn parse_init_token(date: &str, hour: &str) -> Option<DateTime<Utc>> {
    if date.len() != 8 || hour.len() != 2 {
        return None;
    }
    if !date.bytes().chain(hour.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let naive =
        NaiveDateTime::parse_from_str(&format!("{}{}0000", date, hour), "%Y%m%d%H%M%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}
