//! Allow-lists of course codes, extracted from free text

use super::error::Result;
use super::models::normalize_code;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Course-like codes such as `CS1102` or `SDSC3001`.
static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z]{2,}\d{3,4}").unwrap_or_else(|e| panic!("invalid code pattern: {e}"))
});

/// A set of uppercase course codes permitted to remain in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedCodes(BTreeSet<String>);

impl AllowedCodes {
    /// Create an empty allow-list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan arbitrary text for course codes.
    ///
    /// The text is uppercased first, so `cs1102` in a CSV cell still matches.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let upper = text.to_uppercase();
        Self(
            CODE_PATTERN
                .find_iter(&upper)
                .map(|m| m.as_str().to_string())
                .collect(),
        )
    }

    /// Whether `code` is allowed. `code` is expected to be normalized already.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    /// Add a code (normalized)
    pub fn insert(&mut self, code: &str) -> bool {
        self.0.insert(normalize_code(code))
    }

    /// Number of codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the allow-list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowedCodes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|c| normalize_code(c.as_ref())).collect())
    }
}

/// Load allowed course codes from any text or CSV file.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn load_allowed_codes(path: &Path) -> Result<AllowedCodes> {
    let content = fs::read_to_string(path)?;
    Ok(AllowedCodes::from_text(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_codes_from_free_text() {
        let allowed = AllowedCodes::from_text(
            "Core: CS1102, cs2115\nElectives: SDSC3001 (or MA2172); GE1401 4 credits",
        );

        let codes: Vec<&str> = allowed.iter().collect();
        assert_eq!(codes, vec!["CS1102", "CS2115", "GE1401", "MA2172", "SDSC3001"]);
    }

    #[test]
    fn test_ignores_non_codes() {
        let allowed = AllowedCodes::from_text("A1 B22 Year 2024 X12345");
        // "X12345" has a single letter prefix; nothing matches
        assert!(allowed.is_empty());
    }

    #[test]
    fn test_from_iter_normalizes() {
        let allowed: AllowedCodes = [" a1000", "B2000"].into_iter().collect();
        assert!(allowed.contains("A1000"));
        assert!(allowed.contains("B2000"));
        assert_eq!(allowed.len(), 2);
    }
}
