//! Filter command handler

use curriculum_graph::config::Config;
use curriculum_graph::core::allowlist::{load_allowed_codes, AllowedCodes};
use curriculum_graph::core::filter::{filter_dataset, FilterMode, FilterOutcome};
use curriculum_graph::core::models::Dataset;
use curriculum_graph::{verbose, warn};
use std::path::PathBuf;

/// Run the integrity filter against the configured dataset.
///
/// Unreadable allow-list files are reported and skipped; if no codes remain
/// the filter is a no-op.
pub fn run(allow_files: &[PathBuf], in_place: bool, config: &Config) -> bool {
    let allowed = collect_allowed(allow_files);
    verbose!("Allow-list: {} codes", allowed.len());

    let Some(store) = super::open_dataset(config) else {
        return false;
    };
    verbose!("Before filtering: {}", orphan_counts(store.dataset()));

    let mode = if in_place {
        FilterMode::InPlace
    } else {
        FilterMode::Copy
    };

    match filter_dataset(store, &allowed, mode) {
        FilterOutcome::Skipped(store) => {
            println!(
                "✓ Allow-list is empty; {} left unchanged",
                store.path().display()
            );
            true
        }
        FilterOutcome::Filtered { dataset, summary } => {
            verbose!("After filtering: {}", orphan_counts(dataset.dataset()));
            println!("✓ Removed {} prerequisites", summary.prerequisites_removed);
            println!("✓ Removed {} exclusions", summary.exclusions_removed);
            println!("✓ Removed {} courses", summary.courses_removed);
            println!("✓ Filtered dataset: {}", dataset.path().display());
            true
        }
        FilterOutcome::Failed { original, error } => {
            eprintln!(
                "✗ Filter failed, {} left unfiltered: {error}",
                original.path().display()
            );
            false
        }
    }
}

fn orphan_counts(dataset: &Dataset) -> String {
    format!(
        "{} prerequisites and {} exclusions without a course record",
        dataset.orphaned_prerequisites().len(),
        dataset.orphaned_exclusions().len()
    )
}

/// Union of the codes found in every readable allow-list file.
fn collect_allowed(allow_files: &[PathBuf]) -> AllowedCodes {
    let mut allowed = AllowedCodes::new();
    for path in allow_files {
        match load_allowed_codes(path) {
            Ok(codes) => {
                verbose!("  {}: {} codes", path.display(), codes.len());
                for code in codes.iter() {
                    allowed.insert(code);
                }
            }
            Err(e) => {
                warn!("Skipping allow-list {}: {e}", path.display());
                eprintln!("✗ Failed to read allow-list {}: {e}", path.display());
            }
        }
    }
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use curriculum_graph::core::models::Course;
    use std::fs;

    #[test]
    fn test_collect_allowed_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("plan.csv");
        fs::write(&plan, "code,title\ncs1102,Intro\nMA1200,Calculus\n").unwrap();

        let allowed = collect_allowed(&[plan, dir.path().join("missing.txt")]);
        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains("CS1102"));
    }

    #[test]
    fn test_orphan_counts() {
        let mut dataset = Dataset::new();
        dataset.add_course(Course::new("CS2115", "Object Oriented Programming", "CS", 3.0));
        dataset.add_prerequisite("CS2115", "CS1102");
        dataset.add_prerequisite("CS3201", "CS2115");
        dataset.add_exclusion("CS2115", "EE2331");

        assert_eq!(
            orphan_counts(&dataset),
            "1 prerequisites and 1 exclusions without a course record"
        );

        let allowed: AllowedCodes = ["CS2115"].into_iter().collect();
        dataset.delete_prerequisites_outside(&allowed);
        dataset.delete_exclusions_outside(&allowed);
        assert_eq!(
            orphan_counts(&dataset),
            "0 prerequisites and 0 exclusions without a course record"
        );
    }
}
