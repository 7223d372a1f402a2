//! File-backed store: one JSON document holding the three tables
//!
//! ```json
//! {
//!   "courses":       [{"course_code": "CS1102", "course_title": "...", "offering_unit": "CS", "credit_units": 3}],
//!   "prerequisites": [{"course_code": "CS2115", "prereq_code": "CS1102"}],
//!   "exclusions":    [{"course_code": "CS2115", "excluded_code": "EE2331"}]
//! }
//! ```
//!
//! Rows are decoded one at a time; a row that cannot be decoded is skipped
//! with a warning instead of failing the whole load.

use super::{CourseRepository, Staged};
use crate::core::allowlist::AllowedCodes;
use crate::core::error::{CurriculumError, Result};
use crate::core::models::{normalize_code, Course, Dataset, ExclusionEdge, PrerequisiteEdge};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A repository persisted as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    tables: Staged,
}

impl JsonStore {
    /// Open an existing dataset file.
    ///
    /// # Errors
    /// Returns [`CurriculumError::MissingResource`] if the file does not exist,
    /// or an error if it cannot be read or is not a JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(CurriculumError::MissingResource(path));
        }
        let content = fs::read_to_string(&path)?;
        let document: Value = serde_json::from_str(&content)?;
        let dataset = decode_document(&document)?;
        crate::debug!(
            "Opened {}: {} courses, {} prerequisites, {} exclusions",
            path.display(),
            dataset.courses.len(),
            dataset.prerequisites.len(),
            dataset.exclusions.len()
        );
        Ok(Self {
            path,
            tables: Staged::new(dataset),
        })
    }

    /// Write `dataset` to `path` (replacing any existing file) and open it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn create(path: impl AsRef<Path>, dataset: &Dataset) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        write_atomic(&path, dataset)?;
        Ok(Self {
            path,
            tables: Staged::new(dataset.clone()),
        })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Committed contents
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        self.tables.committed()
    }
}

/// Sibling path used for filtered copies: `courses.json` -> `courses_filtered.json`.
#[must_use]
pub fn filtered_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "dataset".to_string(), |s| s.to_string_lossy().to_string());
    let name = match path.extension() {
        Some(ext) => format!("{stem}_filtered.{}", ext.to_string_lossy()),
        None => format!("{stem}_filtered"),
    };
    path.with_file_name(name)
}

/// Serialize to a temp file next to `path`, then rename over it.
fn write_atomic(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = temp_path(path);
    let body = serde_json::to_string_pretty(dataset)?;
    let written = fs::write(&tmp, body).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        // A partial write or a failed rename leaves the temp file behind
        if tmp.is_file() {
            let _ = fs::remove_file(&tmp);
        }
        return Err(e.into());
    }
    Ok(())
}

/// Hidden sibling used while writing: `courses.json` -> `.courses.json.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "dataset".to_string(), |n| n.to_string_lossy().to_string());
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn decode_document(document: &Value) -> Result<Dataset> {
    let Some(object) = document.as_object() else {
        return Err(CurriculumError::Storage(
            "dataset document must be a JSON object".to_string(),
        ));
    };

    let mut dataset = Dataset::new();
    let mut seen = HashSet::new();
    for row in rows(object.get("courses"), "courses") {
        match decode_course(row) {
            Some(course) if seen.insert(course.code.clone()) => dataset.courses.push(course),
            Some(course) => crate::warn!("Skipping duplicate course record {}", course.code),
            None => crate::warn!("Skipping malformed course row: {row}"),
        }
    }
    for row in rows(object.get("prerequisites"), "prerequisites") {
        match decode_pair(row, "prereq_code") {
            Some((course, prereq)) => dataset
                .prerequisites
                .push(PrerequisiteEdge { course_code: course, prereq_code: prereq }),
            None => crate::warn!("Skipping malformed prerequisite row: {row}"),
        }
    }
    for row in rows(object.get("exclusions"), "exclusions") {
        match decode_pair(row, "excluded_code") {
            Some((course, excluded)) => dataset
                .exclusions
                .push(ExclusionEdge { course_code: course, excluded_code: excluded }),
            None => crate::warn!("Skipping malformed exclusion row: {row}"),
        }
    }
    Ok(dataset)
}

/// Rows of a table; a missing table is empty, a non-array table is skipped.
fn rows<'a>(table: Option<&'a Value>, name: &str) -> impl Iterator<Item = &'a Value> {
    let rows = match table {
        None | Some(Value::Null) => None,
        Some(Value::Array(rows)) => Some(rows),
        Some(_) => {
            crate::warn!("Table '{name}' is not an array; treating it as empty");
            None
        }
    };
    rows.into_iter().flatten()
}

fn code_field(row: &Value, field: &str) -> Option<String> {
    let code = normalize_code(row.get(field)?.as_str()?);
    (!code.is_empty()).then_some(code)
}

fn text_field(row: &Value, field: &str) -> String {
    row.get(field)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[allow(clippy::cast_possible_truncation)]
fn decode_course(row: &Value) -> Option<Course> {
    let code = code_field(row, "course_code")?;
    let credit_units = match row.get("credit_units") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .unwrap_or(0.0) as f32;
    Some(Course {
        code,
        title: text_field(row, "course_title"),
        offering_unit: text_field(row, "offering_unit"),
        credit_units,
    })
}

fn decode_pair(row: &Value, target_field: &str) -> Option<(String, String)> {
    Some((code_field(row, "course_code")?, code_field(row, target_field)?))
}

impl CourseRepository for JsonStore {
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
        write_atomic(&self.path, self.tables.current())?;
        self.tables.promote();
        Ok(())
    }

    fn rollback(&mut self) {
        self.tables.discard();
    }

    /// Handle on `<stem>_filtered.<ext>` holding the committed tables.
    /// Nothing is written until the copy is committed.
    fn duplicate(&self) -> Result<Self> {
        Ok(Self {
            path: filtered_path(&self.path),
            tables: Staged::new(self.tables.committed().clone()),
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
