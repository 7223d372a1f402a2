//! Integrity filter: reduce a dataset to an allowed set of course codes
//!
//! The cascade deletes, in order, prerequisite edges owned by a code outside
//! the allow-list, exclusions with either endpoint outside it, and finally the
//! courses themselves. Every predicate is evaluated against the allow-list, not
//! against intermediate state, so the end result does not depend on the order.
//! Prerequisite targets are never checked: external prerequisites survive.

use super::allowlist::AllowedCodes;
use super::error::{CurriculumError, Result};
use super::store::CourseRepository;
use std::fmt;

/// Whether the cascade runs against the given handle or against a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Mutate the dataset behind the handle
    InPlace,
    /// Duplicate the dataset first and filter the duplicate
    #[default]
    Copy,
}

/// Number of rows removed by each step of the cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Size of the allow-list used
    pub allowed: usize,
    /// Prerequisite edges removed
    pub prerequisites_removed: usize,
    /// Exclusion edges removed
    pub exclusions_removed: usize,
    /// Courses removed
    pub courses_removed: usize,
}

impl FilterSummary {
    /// Total rows removed across all tables
    #[must_use]
    pub const fn total_removed(&self) -> usize {
        self.prerequisites_removed + self.exclusions_removed + self.courses_removed
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allowed={} removed: {} prerequisites, {} exclusions, {} courses",
            self.allowed, self.prerequisites_removed, self.exclusions_removed, self.courses_removed
        )
    }
}

/// Result of [`filter_dataset`].
///
/// Every variant hands back a usable dataset handle; a failure never yields a
/// partially filtered one.
#[derive(Debug)]
pub enum FilterOutcome<R> {
    /// The allow-list was empty; nothing was touched
    Skipped(R),
    /// The cascade ran and was committed
    Filtered {
        /// Handle to the filtered dataset (the copy in [`FilterMode::Copy`])
        dataset: R,
        /// What was removed
        summary: FilterSummary,
    },
    /// Copying, staging, or committing failed; `original` is unmodified
    Failed {
        /// The original, unfiltered dataset
        original: R,
        /// What went wrong
        error: CurriculumError,
    },
}

impl<R> FilterOutcome<R> {
    /// The dataset handle to continue working with
    #[must_use]
    pub fn into_dataset(self) -> R {
        match self {
            Self::Skipped(dataset)
            | Self::Filtered { dataset, .. }
            | Self::Failed {
                original: dataset, ..
            } => dataset,
        }
    }

    /// Borrow the dataset handle
    #[must_use]
    pub const fn dataset(&self) -> &R {
        match self {
            Self::Skipped(dataset)
            | Self::Filtered { dataset, .. }
            | Self::Failed {
                original: dataset, ..
            } => dataset,
        }
    }

    /// Whether the filter failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Remove every course not in `allowed`, along with the relations that would dangle.
///
/// An empty `allowed` set is a no-op: it usually means no allow-list was
/// resolved, and emptying the dataset would be the wrong reaction to that.
/// Running the filter again with the same allow-list removes nothing.
///
/// # Arguments
/// * `dataset` - Handle to the dataset to filter
/// * `allowed` - Uppercase course codes to keep
/// * `mode` - Filter in place, or filter a duplicate and leave `dataset` untouched
pub fn filter_dataset<R: CourseRepository>(
    dataset: R,
    allowed: &AllowedCodes,
    mode: FilterMode,
) -> FilterOutcome<R> {
    if allowed.is_empty() {
        crate::warn!(
            "Allow-list is empty; skipping filter of {}",
            dataset.location()
        );
        return FilterOutcome::Skipped(dataset);
    }

    match mode {
        FilterMode::InPlace => {
            let mut dataset = dataset;
            match run_cascade(&mut dataset, allowed) {
                Ok(summary) => FilterOutcome::Filtered { dataset, summary },
                Err(error) => fail_closed(dataset, error),
            }
        }
        FilterMode::Copy => {
            let mut copy = match dataset.duplicate() {
                Ok(copy) => copy,
                Err(error) => return fail_closed(dataset, error),
            };
            match run_cascade(&mut copy, allowed) {
                Ok(summary) => FilterOutcome::Filtered {
                    dataset: copy,
                    summary,
                },
                Err(error) => fail_closed(dataset, error),
            }
        }
    }
}

fn fail_closed<R: CourseRepository>(original: R, error: CurriculumError) -> FilterOutcome<R> {
    crate::error!(
        "Filter failed for {}; dataset left unfiltered: {error}",
        original.location()
    );
    FilterOutcome::Failed { original, error }
}

/// Stage the three deletes and commit them as one unit, rolling back on failure.
fn run_cascade<R: CourseRepository>(dataset: &mut R, allowed: &AllowedCodes) -> Result<FilterSummary> {
    let staged = stage_cascade(dataset, allowed).and_then(|summary| {
        dataset.commit()?;
        Ok(summary)
    });
    match staged {
        Ok(summary) => {
            crate::info!("Filtered {} ({summary})", dataset.location());
            Ok(summary)
        }
        Err(error) => {
            dataset.rollback();
            Err(error)
        }
    }
}

fn stage_cascade<R: CourseRepository>(dataset: &mut R, allowed: &AllowedCodes) -> Result<FilterSummary> {
    let prerequisites_removed = dataset.delete_prerequisites_outside(allowed)?;
    let exclusions_removed = dataset.delete_exclusions_outside(allowed)?;
    let courses_removed = dataset.delete_courses_outside(allowed)?;
    crate::debug!(
        "Staged cascade: {prerequisites_removed} prerequisites, {exclusions_removed} exclusions, {courses_removed} courses"
    );
    Ok(FilterSummary {
        allowed: allowed.len(),
        prerequisites_removed,
        exclusions_removed,
        courses_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, Dataset, ExclusionEdge, PrerequisiteEdge};
    use crate::core::store::MemoryStore;

    fn sample() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("A1000", "Alpha", "U1", 3.0));
        dataset.add_course(Course::new("B2000", "Beta", "U1", 3.0));
        dataset.add_course(Course::new("C3000", "Gamma", "U2", 3.0));
        dataset.add_prerequisite("B2000", "A1000");
        dataset.add_prerequisite("C3000", "A1000");
        dataset.add_prerequisite("C3000", "X9999");
        dataset.add_prerequisite("A1000", "C3000");
        dataset.add_prerequisite("A1000", "Z0001");
        dataset.add_exclusion("B2000", "C3000");
        dataset.add_exclusion("A1000", "B2000");
        dataset
    }

    /// Store whose commit always fails, to exercise fail-closed behaviour.
    #[derive(Debug, Clone)]
    struct BrokenCommit(MemoryStore);

    impl CourseRepository for BrokenCommit {
        fn courses(&self) -> Result<Vec<Course>> {
            self.0.courses()
        }
        fn prerequisites(&self) -> Result<Vec<PrerequisiteEdge>> {
            self.0.prerequisites()
        }
        fn exclusions(&self) -> Result<Vec<ExclusionEdge>> {
            self.0.exclusions()
        }
        fn delete_prerequisites_outside(&mut self, allowed: &AllowedCodes) -> Result<usize> {
            self.0.delete_prerequisites_outside(allowed)
        }
        fn delete_exclusions_outside(&mut self, allowed: &AllowedCodes) -> Result<usize> {
            self.0.delete_exclusions_outside(allowed)
        }
        fn delete_courses_outside(&mut self, allowed: &AllowedCodes) -> Result<usize> {
            self.0.delete_courses_outside(allowed)
        }
        fn commit(&mut self) -> Result<()> {
            Err(CurriculumError::Storage("disk full".to_string()))
        }
        fn rollback(&mut self) {
            self.0.rollback();
        }
        fn duplicate(&self) -> Result<Self> {
            Err(CurriculumError::Storage("cannot copy".to_string()))
        }
        fn location(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_empty_allow_list_is_noop() {
        let outcome = filter_dataset(
            MemoryStore::new(sample()),
            &AllowedCodes::new(),
            FilterMode::InPlace,
        );
        assert!(matches!(outcome, FilterOutcome::Skipped(_)));
        assert_eq!(outcome.into_dataset().into_dataset(), sample());
    }

    #[test]
    fn test_single_code_scenario() {
        let allowed: AllowedCodes = ["A1000"].into_iter().collect();
        let outcome = filter_dataset(MemoryStore::new(sample()), &allowed, FilterMode::InPlace);

        let FilterOutcome::Filtered { dataset, summary } = outcome else {
            panic!("expected filtered outcome");
        };
        let result = dataset.into_dataset();

        assert_eq!(result.course_codes().into_iter().collect::<Vec<_>>(), vec!["A1000"]);
        // Edges owned by A1000 survive even though C3000 and Z0001 are gone
        assert_eq!(result.prerequisites_of("A1000"), vec!["C3000", "Z0001"]);
        assert_eq!(result.prerequisites.len(), 2);
        assert!(result.exclusions.is_empty());
        assert_eq!(summary.courses_removed, 2);
        assert_eq!(summary.prerequisites_removed, 3);
        assert_eq!(summary.exclusions_removed, 2);
        assert_eq!(summary.total_removed(), 7);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let allowed: AllowedCodes = ["A1000", "C3000"].into_iter().collect();
        let once = filter_dataset(MemoryStore::new(sample()), &allowed, FilterMode::InPlace)
            .into_dataset();
        let snapshot = once.dataset().clone();

        let twice = filter_dataset(once, &allowed, FilterMode::InPlace);
        let FilterOutcome::Filtered { dataset, summary } = twice else {
            panic!("expected filtered outcome");
        };
        assert_eq!(summary.total_removed(), 0);
        assert_eq!(dataset.dataset(), &snapshot);
    }

    #[test]
    fn test_copy_mode_leaves_original() {
        let original = MemoryStore::new(sample());
        let allowed: AllowedCodes = ["B2000"].into_iter().collect();

        let filtered = filter_dataset(original.clone(), &allowed, FilterMode::Copy).into_dataset();

        assert_eq!(filtered.dataset().courses.len(), 1);
        assert_eq!(original.dataset(), &sample());
    }

    #[test]
    fn test_commit_failure_fails_closed() {
        let allowed: AllowedCodes = ["A1000"].into_iter().collect();
        let outcome = filter_dataset(
            BrokenCommit(MemoryStore::new(sample())),
            &allowed,
            FilterMode::InPlace,
        );

        assert!(outcome.is_failure());
        let FilterOutcome::Failed { original, error } = outcome else {
            unreachable!();
        };
        assert!(matches!(error, CurriculumError::Storage(_)));
        // Staged deletes were rolled back
        assert_eq!(original.courses().unwrap().len(), 3);
        assert_eq!(original.prerequisites().unwrap().len(), 5);
    }

    #[test]
    fn test_copy_failure_returns_original() {
        let allowed: AllowedCodes = ["A1000"].into_iter().collect();
        let outcome = filter_dataset(
            BrokenCommit(MemoryStore::new(sample())),
            &allowed,
            FilterMode::Copy,
        );

        let FilterOutcome::Failed { original, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(original.location(), "broken");
        assert_eq!(original.courses().unwrap().len(), 3);
    }
}
