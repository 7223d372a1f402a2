//! Error taxonomy shared by storage and analysis

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the dataset storage and the components built on it.
///
/// Data-quality problems inside an otherwise readable dataset (a malformed row,
/// a missing title) are not represented here: they are skipped or degraded
/// where they occur and never abort a batch.
#[derive(Error, Debug)]
pub enum CurriculumError {
    /// Dataset file or storage location does not exist.
    #[error("dataset not found: {}", .0.display())]
    MissingResource(PathBuf),
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The dataset document as a whole could not be decoded or encoded.
    #[error("invalid dataset document: {0}")]
    Json(#[from] serde_json::Error),
    /// Any other storage-level failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, CurriculumError>;
