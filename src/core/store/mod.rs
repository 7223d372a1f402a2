//! Storage collaborator: typed access to the course, prerequisite and exclusion tables
//!
//! Deletes are staged until [`CourseRepository::commit`]; reads always see the
//! staged state. [`CourseRepository::rollback`] discards staged changes, which
//! is what lets the integrity filter fail closed.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use super::allowlist::AllowedCodes;
use super::error::Result;
use super::models::{Course, Dataset, ExclusionEdge, PrerequisiteEdge};

/// Repository over the three entity collections.
pub trait CourseRepository {
    /// All course records
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    fn courses(&self) -> Result<Vec<Course>>;

    /// All prerequisite edges
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    fn prerequisites(&self) -> Result<Vec<PrerequisiteEdge>>;

    /// All exclusion edges
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    fn exclusions(&self) -> Result<Vec<ExclusionEdge>>;

    /// `DELETE FROM prerequisites WHERE course_code NOT IN (allowed)`
    ///
    /// # Errors
    /// Returns an error if the delete cannot be staged.
    fn delete_prerequisites_outside(&mut self, allowed: &AllowedCodes) -> Result<usize>;

    /// `DELETE FROM exclusions WHERE course_code NOT IN (allowed) OR excluded_code NOT IN (allowed)`
    ///
    /// # Errors
    /// Returns an error if the delete cannot be staged.
    fn delete_exclusions_outside(&mut self, allowed: &AllowedCodes) -> Result<usize>;

    /// `DELETE FROM courses WHERE course_code NOT IN (allowed)`
    ///
    /// # Errors
    /// Returns an error if the delete cannot be staged.
    fn delete_courses_outside(&mut self, allowed: &AllowedCodes) -> Result<usize>;

    /// Persist staged changes.
    ///
    /// # Errors
    /// Returns an error if the changes cannot be persisted; the persisted state
    /// is then unchanged and the staged changes are still pending.
    fn commit(&mut self) -> Result<()>;

    /// Discard staged changes.
    fn rollback(&mut self);

    /// Open an independent handle holding a copy of the committed data.
    ///
    /// # Errors
    /// Returns an error if the copy cannot be created or opened.
    fn duplicate(&self) -> Result<Self>
    where
        Self: Sized;

    /// Human-readable location of this handle (a path, or `memory`).
    fn location(&self) -> String;

    /// Read all three tables into one snapshot.
    ///
    /// # Errors
    /// Returns an error if any table cannot be read.
    fn snapshot(&self) -> Result<Dataset> {
        Ok(Dataset {
            courses: self.courses()?,
            prerequisites: self.prerequisites()?,
            exclusions: self.exclusions()?,
        })
    }
}

/// Committed tables plus an optional staged copy, shared by the stores.
#[derive(Debug, Clone, Default)]
pub(crate) struct Staged {
    committed: Dataset,
    pending: Option<Dataset>,
}

impl Staged {
    pub(crate) const fn new(committed: Dataset) -> Self {
        Self {
            committed,
            pending: None,
        }
    }

    /// Current view: staged if any, otherwise committed
    pub(crate) fn current(&self) -> &Dataset {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    pub(crate) const fn committed(&self) -> &Dataset {
        &self.committed
    }

    pub(crate) fn stage(&mut self) -> &mut Dataset {
        self.pending.get_or_insert_with(|| self.committed.clone())
    }

    /// Promote staged changes. Returns `false` when nothing was staged.
    pub(crate) fn promote(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.committed = pending;
                true
            }
            None => false,
        }
    }

    pub(crate) fn discard(&mut self) {
        self.pending = None;
    }
}
