//! Core module: dataset model, storage, and the analysis components

pub mod allowlist;
pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod models;
pub mod render;
pub mod store;

pub use error::CurriculumError;

/// Returns the current version of the `curriculum-graph` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
