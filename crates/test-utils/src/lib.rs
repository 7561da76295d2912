//! Shared test utilities for the nwp-index workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A manually advanced [`ManualClock`]
//! - An in-memory [`MemoryFileSystem`] with settable modification times
//! - Demo directory generators and filename fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod clock;
pub mod fixtures;
pub mod generators;
pub mod memfs;

// Re-export commonly used items at the crate root
pub use clock::ManualClock;
pub use fixtures::*;
pub use generators::*;
pub use memfs::MemoryFileSystem;

/// Assert that a `Result` is an `Err` matching the given pattern.
///
/// ```ignore
/// use test_utils::assert_err_matches;
///
/// assert_err_matches!(codec.decode("x"), NwpError::MalformedFilename { .. });
/// ```
#[macro_export]
macro_rules! assert_err_matches {
    ($result:expr, $pattern:pat $(,)?) => {{
        match $result {
            Err($pattern) => {}
            Err(other) => panic!(
                "expected error matching `{}`, got `{:?}`",
                stringify!($pattern),
                other
            ),
            Ok(_) => panic!("expected error matching `{}`, got Ok", stringify!($pattern)),
        }
    }};
}
