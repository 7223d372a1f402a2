//! CLI argument definitions for `curgraph`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use curriculum_graph::config::ConfigOverrides;
use curriculum_graph::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key to display (e.g., `level`, `dataset`, `max_per_row`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Reset one configuration value to its default.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Reduce the dataset to the course codes found in allow-list files.
    ///
    /// Codes are extracted from any text (e.g. a study-plan CSV). Without
    /// --in-place a filtered copy is written next to the dataset.
    Filter {
        /// Files to scan for allowed course codes
        #[arg(long = "allow", value_name = "FILES", num_args = 1.., required = true)]
        allow_files: Vec<PathBuf>,

        /// Modify the dataset itself instead of a `_filtered` copy
        #[arg(long)]
        in_place: bool,
    },
    /// List prerequisites that are not courses in the dataset.
    External {
        /// Print the condensed listing instead of the full breakdown
        #[arg(long)]
        summary: bool,

        /// Print the report as JSON
        #[arg(long, conflicts_with = "summary")]
        json: bool,
    },
    /// Show courses matching code prefixes and where their prerequisites live.
    Lookup {
        /// Code prefixes (a trailing `%` or `*` is allowed)
        #[arg(value_name = "PATTERN", num_args = 1.., required = true)]
        patterns: Vec<String>,
    },
    /// Lay out courses with no prerequisites and no dependents.
    Roots {
        /// Output file (defaults to `roots.json` / `roots.md` in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write Mermaid text instead of the JSON payload
        #[arg(long)]
        mermaid: bool,

        /// Maximum nodes per row (overrides config; 0 keeps the config value)
        #[arg(long, value_name = "N")]
        max_per_row: Option<usize>,

        /// Maximum title length in labels (overrides config; 0 keeps the config value)
        #[arg(long, value_name = "N")]
        truncate: Option<usize>,
    },
    /// Write the full dependency graph, with exclusions, as a Mermaid diagram.
    Graph {
        /// Output file (defaults to `graph.md` in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "curgraph",
    about = "Curriculum dataset integrity and graph analysis",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Dataset file to operate on (overrides config `dataset`)
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Output directory for generated artifacts (overrides config `out_dir`)
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override for that value.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            dataset: self
                .dataset
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            out_dir: self
                .out_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
