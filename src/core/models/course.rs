//! Course model

use serde::{Deserialize, Serialize};

/// Normalize a course code to its canonical form (trimmed, uppercase).
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Represents a course record in the dataset.
///
/// Identity is the code. Serialized field names match the storage columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code (e.g., "CS1102"), always uppercase
    #[serde(rename = "course_code")]
    pub code: String,

    /// Course title (may be empty when the source omitted it)
    #[serde(rename = "course_title", default)]
    pub title: String,

    /// Department or college offering the course
    #[serde(default)]
    pub offering_unit: String,

    /// Credit units (can be fractional)
    #[serde(default)]
    pub credit_units: f32,
}

impl Course {
    /// Create a new course; the code is normalized to uppercase.
    ///
    /// # Arguments
    /// * `code` - Course code
    /// * `title` - Course title
    /// * `offering_unit` - Offering unit
    /// * `credit_units` - Credit units
    #[must_use]
    pub fn new(code: &str, title: &str, offering_unit: &str, credit_units: f32) -> Self {
        Self {
            code: normalize_code(code),
            title: title.trim().to_string(),
            offering_unit: offering_unit.trim().to_string(),
            credit_units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation_normalizes_code() {
        let course = Course::new(" cs1102 ", "Introduction to Computer Studies", "CS", 3.0);

        assert_eq!(course.code, "CS1102");
        assert_eq!(course.title, "Introduction to Computer Studies");
        assert_eq!(course.offering_unit, "CS");
        assert!((course.credit_units - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_serialized_field_names_match_columns() {
        let course = Course::new("SDSC3001", "Big Data", "SDSC", 3.0);
        let json = serde_json::to_value(&course).unwrap();

        assert_eq!(json["course_code"], "SDSC3001");
        assert_eq!(json["course_title"], "Big Data");
        assert_eq!(json["offering_unit"], "SDSC");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let course: Course = serde_json::from_str(r#"{"course_code": "MA1200"}"#).unwrap();

        assert_eq!(course.code, "MA1200");
        assert!(course.title.is_empty());
        assert!(course.credit_units.abs() < f32::EPSILON);
    }
}
