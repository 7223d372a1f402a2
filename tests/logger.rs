//! Integration tests for logger behavior.

use curriculum_graph::logger::{
    init_file_logging, is_verbose_enabled, level, set_level, set_level_from_str, Level,
};
use curriculum_graph::{debug, error, info, verbose, warn};
use std::fs;

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
    verbose!("verbose integration (enabled: {})", is_verbose_enabled());
    assert!(level() <= Level::Debug);
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_appends_tagged_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("logs").join("curgraph.log");

    assert!(init_file_logging(&path));
    error!("written to file");

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[ERROR] written to file"));
}
