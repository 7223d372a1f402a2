//! Shared library for `curriculum-graph`
//! Contains the dataset model, storage, and analysis used by the CLI.

pub mod core;
pub mod logger;

pub use self::core::config;
pub use self::core::get_version;
