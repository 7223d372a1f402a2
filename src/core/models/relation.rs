//! Prerequisite and exclusion relations between course codes

use super::course::normalize_code;
use serde::{Deserialize, Serialize};

/// "`prereq_code` must be satisfied to take `course_code`."
///
/// `prereq_code` may name a course outside the dataset (an external
/// prerequisite). Several edges may share a `course_code`; whether they are
/// meant conjunctively or disjunctively is not recorded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    /// The course that has the requirement
    pub course_code: String,
    /// The required course
    pub prereq_code: String,
}

impl PrerequisiteEdge {
    /// Create a new edge with both codes normalized.
    #[must_use]
    pub fn new(course_code: &str, prereq_code: &str) -> Self {
        Self {
            course_code: normalize_code(course_code),
            prereq_code: normalize_code(prereq_code),
        }
    }
}

/// "Taking `course_code` precludes credit for `excluded_code`" (or the reverse;
/// both directions may be recorded).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExclusionEdge {
    /// The course declaring the exclusion
    pub course_code: String,
    /// The excluded course
    pub excluded_code: String,
}

impl ExclusionEdge {
    /// Create a new exclusion with both codes normalized.
    #[must_use]
    pub fn new(course_code: &str, excluded_code: &str) -> Self {
        Self {
            course_code: normalize_code(course_code),
            excluded_code: normalize_code(excluded_code),
        }
    }

    /// Whether both endpoints satisfy `keep`.
    pub fn both_endpoints(&self, mut keep: impl FnMut(&str) -> bool) -> bool {
        keep(&self.course_code) && keep(&self.excluded_code)
    }
}
