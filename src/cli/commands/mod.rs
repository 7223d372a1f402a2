//! CLI command handlers for `curgraph`.
//!
//! Each command is implemented in its own submodule. Handlers report failures
//! on stderr with a `✗` prefix and return whether the command succeeded.

pub mod config;
pub mod external;
pub mod filter;
pub mod graph;
pub mod roots;

use curriculum_graph::config::Config;
use curriculum_graph::core::store::JsonStore;
use curriculum_graph::error;
use std::path::{Path, PathBuf};

/// Open the configured dataset, printing a `✗` message on failure.
fn open_dataset(config: &Config) -> Option<JsonStore> {
    let path = Path::new(&config.dataset.path);
    match JsonStore::open(path) {
        Ok(store) => Some(store),
        Err(e) => {
            error!("Failed to open dataset {}: {e}", path.display());
            eprintln!("✗ Failed to open dataset {}: {e}", path.display());
            None
        }
    }
}

/// `explicit`, or `<out_dir>/<file_name>` when no output path was given.
fn output_path(explicit: Option<&Path>, config: &Config, file_name: &str) -> PathBuf {
    explicit.map_or_else(
        || PathBuf::from(&config.paths.out_dir).join(file_name),
        Path::to_path_buf,
    )
}
