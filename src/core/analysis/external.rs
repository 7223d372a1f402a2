//! External prerequisite analysis
//!
//! An external prerequisite is a code referenced by a prerequisite edge but
//! with no course record in the dataset. For each one the report lists the
//! dependent courses together with their complete prerequisite lists split
//! into internal and external codes.

use crate::core::error::Result;
use crate::core::models::Dataset;
use crate::core::store::CourseRepository;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

/// A course that depends on at least one external prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentCourse {
    /// Dependent course code
    pub code: String,
    /// Title, or empty when the dependent has no course record
    pub title: String,
    /// Prerequisites that are courses in the dataset, sorted
    pub internal: Vec<String>,
    /// Prerequisites that are not courses in the dataset, sorted
    pub external: Vec<String>,
    /// Number of recorded prerequisite edges for this course
    pub edge_count: usize,
    /// More than one edge: the source may have meant "one of" rather than "all of"
    pub possibly_disjunctive: bool,
}

/// Result of [`analyze_external`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExternalReport {
    /// Distinct course codes in the dataset
    pub course_count: usize,
    /// Distinct prerequisite codes referenced by edges
    pub prerequisite_count: usize,
    /// External code -> courses that depend on it, both sorted by code
    pub external: BTreeMap<String, Vec<DependentCourse>>,
}

impl ExternalReport {
    /// The set of external prerequisite codes
    #[must_use]
    pub fn external_codes(&self) -> BTreeSet<String> {
        self.external.keys().cloned().collect()
    }

    /// Whether no external prerequisite was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.external.is_empty()
    }

    /// Dependents of one external code
    #[must_use]
    pub fn dependents(&self, external_code: &str) -> Option<&[DependentCourse]> {
        self.external.get(external_code).map(Vec::as_slice)
    }

    /// Condensed listing: at most `max_codes` external codes with at most
    /// `max_dependents` dependent codes each.
    #[must_use]
    pub fn summary(&self, max_codes: usize, max_dependents: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total courses in course list: {}", self.course_count);
        let _ = writeln!(out, "Total unique prerequisites: {}", self.prerequisite_count);
        let _ = writeln!(
            out,
            "External prerequisites (not in course list): {}",
            self.external.len()
        );
        if self.is_empty() {
            let _ = writeln!(out, "\n{NO_EXTERNAL}");
            return out;
        }
        let _ = writeln!(out, "\nExternal prerequisite examples:");
        for (code, dependents) in self.external.iter().take(max_codes) {
            let shown: Vec<&str> = dependents
                .iter()
                .take(max_dependents)
                .map(|d| d.code.as_str())
                .collect();
            let more = if dependents.len() > max_dependents { "..." } else { "" };
            let _ = writeln!(out, "  {code} -> required by: {}{more}", shown.join(", "));
        }
        out
    }
}

const NO_EXTERNAL: &str =
    "No external prerequisites found - all prerequisites are in the course list.";

impl fmt::Display for ExternalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "External prerequisites ({} total)", self.external.len())?;
        writeln!(f, "{}", "=".repeat(80))?;
        if self.is_empty() {
            return writeln!(f, "{NO_EXTERNAL}");
        }
        for (code, dependents) in &self.external {
            let codes: Vec<&str> = dependents.iter().map(|d| d.code.as_str()).collect();
            writeln!(f, "\nExternal prerequisite: {code}")?;
            writeln!(f, "  Required by: {}", codes.join(", "))?;
            for dependent in dependents {
                writeln!(f, "\n  -> {}: {}", dependent.code, dependent.title)?;
                writeln!(f, "     Internal prerequisites: {}", list_or_none(&dependent.internal))?;
                writeln!(f, "     External prerequisites: {}", list_or_none(&dependent.external))?;
                if dependent.possibly_disjunctive {
                    writeln!(
                        f,
                        "     ⚠ {} prerequisites recorded; may be an \"or\" relation (pick one of N)",
                        dependent.edge_count
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn list_or_none(codes: &[String]) -> String {
    if codes.is_empty() {
        "None".to_string()
    } else {
        codes.join(", ")
    }
}

/// Classify prerequisite codes as internal or external to the dataset in `repo`.
///
/// # Errors
/// Returns an error if the storage cannot be read.
pub fn analyze_external<R: CourseRepository>(repo: &R) -> Result<ExternalReport> {
    let dataset = repo.snapshot()?;
    Ok(external_report(&dataset))
}

/// Build the external prerequisite report for an in-memory dataset.
#[must_use]
pub fn external_report(dataset: &Dataset) -> ExternalReport {
    let all_courses = dataset.course_codes();
    let all_prereqs = dataset.prerequisite_codes();

    let mut external = BTreeMap::new();
    for code in all_prereqs.difference(&all_courses) {
        let dependents = dataset
            .dependents_of(code)
            .into_iter()
            .map(|dependent| describe_dependent(dataset, &all_courses, dependent))
            .collect();
        external.insert(code.clone(), dependents);
    }

    crate::debug!(
        "External analysis: {} courses, {} prerequisite codes, {} external",
        all_courses.len(),
        all_prereqs.len(),
        external.len()
    );

    ExternalReport {
        course_count: all_courses.len(),
        prerequisite_count: all_prereqs.len(),
        external,
    }
}

fn describe_dependent(dataset: &Dataset, all_courses: &BTreeSet<String>, code: &str) -> DependentCourse {
    let recorded = dataset.prerequisites_of(code);
    let distinct: BTreeSet<&str> = recorded.iter().copied().collect();
    let (internal, external): (Vec<&str>, Vec<&str>) =
        distinct.into_iter().partition(|p| all_courses.contains(*p));

    let title = dataset
        .get_course(code)
        .map(|c| c.title.clone())
        .unwrap_or_default();

    DependentCourse {
        code: code.to_string(),
        title,
        internal: internal.into_iter().map(str::to_string).collect(),
        external: external.into_iter().map(str::to_string).collect(),
        edge_count: recorded.len(),
        possibly_disjunctive: recorded.len() > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Course;

    fn scenario() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("A1000", "Alpha", "U1", 3.0));
        dataset.add_course(Course::new("B2000", "Beta", "U1", 3.0));
        dataset.add_course(Course::new("C3000", "Gamma", "U2", 3.0));
        dataset.add_prerequisite("B2000", "A1000");
        dataset.add_prerequisite("C3000", "A1000");
        dataset.add_prerequisite("C3000", "X9999");
        dataset
    }

    #[test]
    fn test_scenario_report() {
        let report = external_report(&scenario());

        assert_eq!(report.course_count, 3);
        assert_eq!(report.prerequisite_count, 2);
        assert_eq!(report.external_codes().into_iter().collect::<Vec<_>>(), vec!["X9999"]);

        let dependents = report.dependents("X9999").unwrap();
        assert_eq!(dependents.len(), 1);
        let c3000 = &dependents[0];
        assert_eq!(c3000.code, "C3000");
        assert_eq!(c3000.title, "Gamma");
        assert_eq!(c3000.internal, vec!["A1000"]);
        assert_eq!(c3000.external, vec!["X9999"]);
        assert_eq!(c3000.edge_count, 2);
        assert!(c3000.possibly_disjunctive);
    }

    #[test]
    fn test_single_edge_not_flagged() {
        let mut dataset = scenario();
        dataset.add_course(Course::new("D4000", "Delta", "U2", 3.0));
        dataset.add_prerequisite("D4000", "Y8888");

        let report = external_report(&dataset);
        let d4000 = &report.dependents("Y8888").unwrap()[0];
        assert!(d4000.internal.is_empty());
        assert_eq!(d4000.external, vec!["Y8888"]);
        assert!(!d4000.possibly_disjunctive);
    }

    #[test]
    fn test_dependent_without_course_record() {
        let mut dataset = scenario();
        dataset.add_prerequisite("Q7777", "X9999");

        let report = external_report(&dataset);
        let dependents = report.dependents("X9999").unwrap();
        let codes: Vec<&str> = dependents.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["C3000", "Q7777"]);
        assert!(dependents[1].title.is_empty());
    }

    #[test]
    fn test_no_external_prerequisites() {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("A1000", "Alpha", "U1", 3.0));
        dataset.add_course(Course::new("B2000", "Beta", "U1", 3.0));
        dataset.add_prerequisite("B2000", "A1000");

        let report = external_report(&dataset);
        assert!(report.is_empty());
        assert!(report.to_string().contains("No external prerequisites found"));
        assert!(report.summary(20, 5).contains("No external prerequisites found"));
    }

    #[test]
    fn test_summary_truncates_dependents() {
        let mut dataset = Dataset::new();
        for i in 0..7 {
            let code = format!("CS{}", 1000 + i);
            dataset.add_course(Course::new(&code, "Course", "CS", 3.0));
            dataset.add_prerequisite(&code, "MA1200");
        }

        let summary = external_report(&dataset).summary(20, 5);
        assert!(summary.contains("MA1200 -> required by: CS1000, CS1001, CS1002, CS1003, CS1004..."));
    }

    #[test]
    fn test_display_marks_disjunctive() {
        let text = external_report(&scenario()).to_string();
        assert!(text.contains("External prerequisite: X9999"));
        assert!(text.contains("Internal prerequisites: A1000"));
        assert!(text.contains("may be an \"or\" relation"));
    }
}
