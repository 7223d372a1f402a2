//! In-memory store, used as a test fixture and for datasets built in-process

use super::{CourseRepository, Staged};
use crate::core::allowlist::AllowedCodes;
use crate::core::error::Result;
use crate::core::models::{Course, Dataset, ExclusionEdge, PrerequisiteEdge};

/// A repository backed entirely by memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Staged,
}

impl MemoryStore {
    /// Wrap a dataset
    #[must_use]
    pub const fn new(dataset: Dataset) -> Self {
        Self {
            tables: Staged::new(dataset),
        }
    }

    /// Committed contents
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        self.tables.committed()
    }

    /// Consume the store, returning its committed contents
    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        self.tables.committed().clone()
    }
}

impl From<Dataset> for MemoryStore {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}

impl CourseRepository for MemoryStore {
    fn courses(&self) -> Result<Vec<Course>> {
        Ok(self.tables.current().courses.clone())
    }

    fn prerequisites(&self) -> Result<Vec<PrerequisiteEdge>> {
        Ok(self.tables.current().prerequisites.clone())
    }

    fn exclusions(&self) -> Result<Vec<ExclusionEdge>> {
        Ok(self.tables.current().exclusions.clone())
    }

    fn delete_prerequisites_outside(&mut self, allowed: &AllowedCodes) -> Result<usize> {
        Ok(self.tables.stage().delete_prerequisites_outside(allowed))
    }

    fn delete_exclusions_outside(&mut self, allowed: &AllowedCodes) -> Result<usize> {
        Ok(self.tables.stage().delete_exclusions_outside(allowed))
    }

    fn delete_courses_outside(&mut self, allowed: &AllowedCodes) -> Result<usize> {
        Ok(self.tables.stage().delete_courses_outside(allowed))
    }

    fn commit(&mut self) -> Result<()> {
        self.tables.promote();
        Ok(())
    }

    fn rollback(&mut self) {
        self.tables.discard();
    }

    fn duplicate(&self) -> Result<Self> {
        Ok(Self::new(self.tables.committed().clone()))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("A1000", "Alpha", "U1", 3.0));
        dataset.add_course(Course::new("B2000", "Beta", "U1", 3.0));
        dataset.add_prerequisite("B2000", "A1000");
        MemoryStore::new(dataset)
    }

    #[test]
    fn test_reads_see_staged_deletes() {
        let mut store = store();
        let allowed: AllowedCodes = ["A1000"].into_iter().collect();

        assert_eq!(store.delete_courses_outside(&allowed).unwrap(), 1);
        assert_eq!(store.courses().unwrap().len(), 1);
        // Not committed yet
        assert_eq!(store.dataset().courses.len(), 2);
    }

    #[test]
    fn test_commit_and_rollback() {
        let mut store = store();
        let allowed: AllowedCodes = ["A1000"].into_iter().collect();

        store.delete_prerequisites_outside(&allowed).unwrap();
        store.rollback();
        assert_eq!(store.prerequisites().unwrap().len(), 1);

        store.delete_prerequisites_outside(&allowed).unwrap();
        store.commit().unwrap();
        assert!(store.dataset().prerequisites.is_empty());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let original = store();
        let mut copy = original.duplicate().unwrap();
        let allowed: AllowedCodes = ["A1000"].into_iter().collect();

        copy.delete_courses_outside(&allowed).unwrap();
        copy.commit().unwrap();

        assert_eq!(copy.dataset().courses.len(), 1);
        assert_eq!(original.dataset().courses.len(), 2);
    }
}
