//! Data models for `curriculum-graph`

pub mod course;
pub mod dataset;
pub mod relation;

pub use course::{normalize_code, Course};
pub use dataset::Dataset;
pub use relation::{ExclusionEdge, PrerequisiteEdge};
