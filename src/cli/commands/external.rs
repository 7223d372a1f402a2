//! External-prerequisite and lookup command handlers

use curriculum_graph::config::Config;
use curriculum_graph::core::analysis::{analyze_external, lookup_course};
use curriculum_graph::core::render::to_json;
use curriculum_graph::error;

/// External codes listed by `--summary`
const SUMMARY_MAX_CODES: usize = 20;
/// Dependents listed per code by `--summary`
const SUMMARY_MAX_DEPENDENTS: usize = 5;

/// Run the external dependency analysis on the configured dataset.
pub fn run(summary: bool, json: bool, config: &Config) -> bool {
    let Some(store) = super::open_dataset(config) else {
        return false;
    };

    let report = match analyze_external(&store) {
        Ok(report) => report,
        Err(e) => {
            error!("External analysis failed for {}: {e}", store.path().display());
            eprintln!("✗ External analysis failed: {e}");
            return false;
        }
    };

    if json {
        match to_json(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("✗ Failed to serialize report: {e}");
                return false;
            }
        }
    } else if summary {
        print!(
            "{}",
            report.summary(SUMMARY_MAX_CODES, SUMMARY_MAX_DEPENDENTS)
        );
    } else {
        print!("{report}");
    }
    true
}

/// Print courses matching `patterns` and where their prerequisites live.
pub fn lookup(patterns: &[String], config: &Config) -> bool {
    let Some(store) = super::open_dataset(config) else {
        return false;
    };

    match lookup_course(&store, patterns) {
        Ok(report) => {
            print!("{report}");
            true
        }
        Err(e) => {
            eprintln!("✗ Lookup failed: {e}");
            false
        }
    }
}
