//! Common types and utilities shared by the NWP index and cache crates.

pub mod clock;
pub mod error;
pub mod fingerprint;
pub mod fs;
pub mod level;
pub mod time;

pub use clock::{Clock, SystemClock};
pub use error::{NwpError, NwpResult};
pub use fingerprint::{normalize_path, Fingerprint};
pub use fs::{FileSystem, LocalFileSystem};
pub use level::LevelType;
pub use time::{lead_time_hours, MAX_LEAD_HOURS};
