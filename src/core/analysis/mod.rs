//! Read-only analyses over a dataset snapshot

pub mod external;
pub mod lookup;

pub use external::{analyze_external, DependentCourse, ExternalReport};
pub use lookup::{lookup_course, CourseLookup, CourseReport, PrerequisiteStatus};
