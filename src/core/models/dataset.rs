//! In-memory dataset: the three entity tables

use super::{Course, ExclusionEdge, PrerequisiteEdge};
use crate::core::allowlist::AllowedCodes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Courses plus their prerequisite and exclusion relations.
///
/// Pre-filtering the tables may be noisy: prerequisite edges can be owned by
/// codes with no course record. After an integrity filter every relation
/// stays inside the allowed set (prerequisite targets excepted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Course records, unique by code
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Prerequisite edges
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteEdge>,
    /// Exclusion edges
    #[serde(default)]
    pub exclusions: Vec<ExclusionEdge>,
}

impl Dataset {
    /// Create an empty dataset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a course. Returns `false` (and keeps the existing record) if the code is taken.
    pub fn add_course(&mut self, course: Course) -> bool {
        if self.get_course(&course.code).is_some() {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Record a prerequisite edge `(course_code, prereq_code)`.
    pub fn add_prerequisite(&mut self, course_code: &str, prereq_code: &str) {
        self.prerequisites
            .push(PrerequisiteEdge::new(course_code, prereq_code));
    }

    /// Record an exclusion edge `(course_code, excluded_code)`.
    pub fn add_exclusion(&mut self, course_code: &str, excluded_code: &str) {
        self.exclusions
            .push(ExclusionEdge::new(course_code, excluded_code));
    }

    /// Look up a course by code
    #[must_use]
    pub fn get_course(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    /// Distinct course codes
    #[must_use]
    pub fn course_codes(&self) -> BTreeSet<String> {
        self.courses.iter().map(|c| c.code.clone()).collect()
    }

    /// Distinct prerequisite codes referenced by any edge
    #[must_use]
    pub fn prerequisite_codes(&self) -> BTreeSet<String> {
        self.prerequisites
            .iter()
            .map(|e| e.prereq_code.clone())
            .collect()
    }

    /// Every recorded prerequisite code of `course_code`, one entry per edge.
    #[must_use]
    pub fn prerequisites_of(&self, course_code: &str) -> Vec<&str> {
        self.prerequisites
            .iter()
            .filter(|e| e.course_code == course_code)
            .map(|e| e.prereq_code.as_str())
            .collect()
    }

    /// Distinct courses that list `prereq_code` as a prerequisite, sorted.
    #[must_use]
    pub fn dependents_of(&self, prereq_code: &str) -> Vec<&str> {
        let dependents: BTreeSet<&str> = self
            .prerequisites
            .iter()
            .filter(|e| e.prereq_code == prereq_code)
            .map(|e| e.course_code.as_str())
            .collect();
        dependents.into_iter().collect()
    }

    /// Prerequisite edges whose owning course has no record.
    #[must_use]
    pub fn orphaned_prerequisites(&self) -> Vec<&PrerequisiteEdge> {
        let codes = self.course_codes();
        self.prerequisites
            .iter()
            .filter(|e| !codes.contains(&e.course_code))
            .collect()
    }

    /// Exclusion edges with at least one endpoint that has no course record.
    #[must_use]
    pub fn orphaned_exclusions(&self) -> Vec<&ExclusionEdge> {
        let codes = self.course_codes();
        self.exclusions
            .iter()
            .filter(|e| !e.both_endpoints(|c| codes.contains(c)))
            .collect()
    }

    /// Delete prerequisite edges owned by a code outside `allowed`.
    /// The prerequisite side is never checked. Returns the number removed.
    pub fn delete_prerequisites_outside(&mut self, allowed: &AllowedCodes) -> usize {
        let before = self.prerequisites.len();
        self.prerequisites
            .retain(|e| allowed.contains(&e.course_code));
        before - self.prerequisites.len()
    }

    /// Delete exclusions where either endpoint is outside `allowed`.
    pub fn delete_exclusions_outside(&mut self, allowed: &AllowedCodes) -> usize {
        let before = self.exclusions.len();
        self.exclusions
            .retain(|e| e.both_endpoints(|c| allowed.contains(c)));
        before - self.exclusions.len()
    }

    /// Delete courses whose code is outside `allowed`.
    pub fn delete_courses_outside(&mut self, allowed: &AllowedCodes) -> usize {
        let before = self.courses.len();
        self.courses.retain(|c| allowed.contains(&c.code));
        before - self.courses.len()
    }

    /// Whether all three tables are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.prerequisites.is_empty() && self.exclusions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("A1000", "Alpha", "U1", 3.0));
        dataset.add_course(Course::new("B2000", "Beta", "U1", 3.0));
        dataset.add_course(Course::new("C3000", "Gamma", "U2", 3.0));
        dataset.add_prerequisite("B2000", "A1000");
        dataset.add_prerequisite("C3000", "A1000");
        dataset.add_prerequisite("C3000", "X9999");
        dataset.add_exclusion("B2000", "C3000");
        dataset
    }

    #[test]
    fn test_duplicate_course_rejected() {
        let mut dataset = sample();
        assert!(!dataset.add_course(Course::new("a1000", "Other", "U9", 1.0)));
        assert_eq!(dataset.courses.len(), 3);
        assert_eq!(dataset.get_course("A1000").unwrap().title, "Alpha");
    }

    #[test]
    fn test_code_sets() {
        let dataset = sample();
        assert_eq!(dataset.course_codes().len(), 3);
        let prereqs: Vec<String> = dataset.prerequisite_codes().into_iter().collect();
        assert_eq!(prereqs, vec!["A1000".to_string(), "X9999".to_string()]);
    }

    #[test]
    fn test_prerequisites_and_dependents() {
        let dataset = sample();
        assert_eq!(dataset.prerequisites_of("C3000"), vec!["A1000", "X9999"]);
        assert_eq!(dataset.dependents_of("A1000"), vec!["B2000", "C3000"]);
        assert!(dataset.dependents_of("B2000").is_empty());
    }

    #[test]
    fn test_orphans() {
        let mut dataset = sample();
        dataset.add_prerequisite("Z5000", "A1000");
        dataset.add_exclusion("A1000", "Q1234");

        assert_eq!(dataset.orphaned_prerequisites().len(), 1);
        assert_eq!(dataset.orphaned_exclusions().len(), 1);
    }

    #[test]
    fn test_delete_outside_keeps_external_prereq_targets() {
        let mut dataset = sample();
        let allowed: AllowedCodes = ["C3000", "A1000"].into_iter().collect();

        assert_eq!(dataset.delete_prerequisites_outside(&allowed), 1);
        assert_eq!(dataset.delete_exclusions_outside(&allowed), 1);
        assert_eq!(dataset.delete_courses_outside(&allowed), 1);

        assert_eq!(dataset.prerequisites_of("C3000"), vec!["A1000", "X9999"]);
        assert!(dataset.exclusions.is_empty());
        assert!(dataset.get_course("B2000").is_none());
    }
}
