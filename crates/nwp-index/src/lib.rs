//! Index of NWP model output files.
//!
//! Maps `(variable, level type, init time, valid time)` to filenames and
//! back, scans a data directory, and assembles the result into a typed
//! [`FileTree`] keyed by init time, lead time and variable tag.
//!
//! # Architecture
//!
//! - [`codec`]: filename grammar `{YYYYMMDD}_{HH}_{model}.{tag}.{grid}.{lead:03}.{level}.nc`
//! - [`scanner`]: directory listing over a [`nwp_common::FileSystem`]
//! - [`indexer`]: builds the [`FileTree`] for a [`DataSource`]
//! - [`access`]: the facade a data-serving layer talks to, including
//!   valid-time lookups backed by the `vt-cache` crate

pub mod access;
pub mod codec;
pub mod indexer;
pub mod scanner;
pub mod source;
pub mod tree;
pub mod variables;

// Re-exports
pub use access::{DatasetOpenOptions, NwpDataAccess, ValidTimeExtractor};
pub use codec::{FileDescriptor, FilenameCodec};
pub use indexer::FileTreeIndexer;
pub use scanner::DirectoryScanner;
pub use source::{load_sources, parse_sources, DataSource, SourceConfig, DEFAULT_MODEL_TAG};
pub use tree::{FileTree, InitTimeNode, LeadTimeNode};
pub use variables::{file_tag, variable_for_tag, PRESSURE_LEVELS_TAG, SURFACE_TAG};

pub use nwp_common::{Fingerprint, LevelType, NwpError, NwpResult};
