//! Point lookup of courses by code prefix, for ad-hoc diagnostics

use crate::core::error::Result;
use crate::core::models::{normalize_code, Dataset};
use crate::core::store::CourseRepository;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One prerequisite of a looked-up course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteStatus {
    /// Prerequisite code
    pub code: String,
    /// Whether the code is a course in the dataset
    pub internal: bool,
}

/// A course matched by a lookup pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseLookup {
    /// Course code
    pub code: String,
    /// Course title
    pub title: String,
    /// Recorded prerequisites in code order
    pub prerequisites: Vec<PrerequisiteStatus>,
}

/// Result of [`lookup_course`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseReport {
    /// Patterns as given (normalized)
    pub patterns: Vec<String>,
    /// Matching courses sorted by code
    pub matches: Vec<CourseLookup>,
}

/// Strip an SQL-style or glob-style trailing wildcard and normalize.
fn prefix_of(pattern: &str) -> String {
    normalize_code(pattern.trim().trim_end_matches(['%', '*']))
}

/// Find courses whose code starts with any of `patterns`, with their prerequisites
/// annotated as internal or external.
///
/// # Errors
/// Returns an error if the storage cannot be read.
pub fn lookup_course<R, S>(repo: &R, patterns: &[S]) -> Result<CourseReport>
where
    R: CourseRepository,
    S: AsRef<str>,
{
    let dataset = repo.snapshot()?;
    Ok(course_report(&dataset, patterns))
}

/// [`lookup_course`] over an in-memory dataset.
#[must_use]
pub fn course_report<S: AsRef<str>>(dataset: &Dataset, patterns: &[S]) -> CourseReport {
    // An empty prefix (a bare `%` or `*`) matches every course
    let prefixes: Vec<String> = patterns.iter().map(|p| prefix_of(p.as_ref())).collect();
    let all_courses = dataset.course_codes();

    let mut matched: Vec<_> = dataset
        .courses
        .iter()
        .filter(|c| prefixes.iter().any(|p| c.code.starts_with(p.as_str())))
        .collect();
    matched.sort_by(|a, b| a.code.cmp(&b.code));

    let matches = matched
        .into_iter()
        .map(|course| {
            let codes: BTreeSet<&str> = dataset.prerequisites_of(&course.code).into_iter().collect();
            CourseLookup {
                code: course.code.clone(),
                title: course.title.clone(),
                prerequisites: codes
                    .into_iter()
                    .map(|code| PrerequisiteStatus {
                        code: code.to_string(),
                        internal: all_courses.contains(code),
                    })
                    .collect(),
            }
        })
        .collect();

    CourseReport {
        patterns: prefixes,
        matches,
    }
}

impl fmt::Display for CourseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: Vec<String> = self
            .patterns
            .iter()
            .map(|p| format!("{p}%"))
            .collect();
        let joined = shown.join(" or ");
        if self.matches.is_empty() {
            return writeln!(f, "No courses match {joined}");
        }
        writeln!(f, "Courses matching {joined}:")?;
        for course in &self.matches {
            writeln!(f, "  {}: {}", course.code, course.title)?;
            if course.prerequisites.is_empty() {
                writeln!(f, "  No prerequisites found for {}", course.code)?;
            } else {
                writeln!(f, "  Prerequisites for {}:", course.code)?;
                for prereq in &course.prerequisites {
                    let status = if prereq.internal {
                        "in course list"
                    } else {
                        "EXTERNAL - not in course list"
                    };
                    writeln!(f, "    {} ({status})", prereq.code)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Course;

    fn dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("CS3201", "Databases", "CS", 3.0));
        dataset.add_course(Course::new("CS3201A", "Databases Lab", "CS", 1.0));
        dataset.add_course(Course::new("CS2115", "OOP", "CS", 3.0));
        dataset.add_prerequisite("CS3201", "CS2115");
        dataset.add_prerequisite("CS3201", "EE2331");
        dataset
    }

    #[test]
    fn test_prefix_patterns() {
        assert_eq!(prefix_of("cs3201%"), "CS3201");
        assert_eq!(prefix_of("CS32*"), "CS32");
    }

    #[test]
    fn test_lookup_annotates_prerequisites() {
        let report = course_report(&dataset(), &["CS3201"]);

        let codes: Vec<&str> = report.matches.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["CS3201", "CS3201A"]);

        let prereqs = &report.matches[0].prerequisites;
        assert_eq!(prereqs.len(), 2);
        assert_eq!(prereqs[0].code, "CS2115");
        assert!(prereqs[0].internal);
        assert_eq!(prereqs[1].code, "EE2331");
        assert!(!prereqs[1].internal);

        let text = report.to_string();
        assert!(text.contains("EE2331 (EXTERNAL - not in course list)"));
        assert!(text.contains("No prerequisites found for CS3201A"));
    }

    #[test]
    fn test_multiple_patterns() {
        let report = course_report(&dataset(), &["C3201%", "CS2115"]);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].code, "CS2115");
    }

    #[test]
    fn test_bare_wildcard_matches_everything() {
        for pattern in ["%", "*"] {
            let report = course_report(&dataset(), &[pattern]);
            let codes: Vec<&str> = report.matches.iter().map(|m| m.code.as_str()).collect();
            assert_eq!(codes, vec!["CS2115", "CS3201", "CS3201A"]);
            assert!(report.to_string().starts_with("Courses matching %:"));
        }
    }

    #[test]
    fn test_no_match() {
        let report = course_report(&dataset(), &["MA"]);
        assert!(report.matches.is_empty());
        assert!(report.to_string().starts_with("No courses match MA%"));
    }
}
