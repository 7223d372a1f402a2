//! Command-line interface entry point for `curgraph`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use curriculum_graph::config::{Config, ConfigOverrides};
use curriculum_graph::info;
use curriculum_graph::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    // `stored` mirrors the config file; only `config` carries this run's overrides
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let config = with_overrides(&stored, &args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let succeeded = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut stored, &defaults),
        Command::Filter {
            allow_files,
            in_place,
        } => commands::filter::run(&allow_files, in_place, &config),
        Command::External { summary, json } => commands::external::run(summary, json, &config),
        Command::Lookup { patterns } => commands::external::lookup(&patterns, &config),
        Command::Roots {
            output,
            mermaid,
            max_per_row,
            truncate,
        } => commands::roots::run(output.as_deref(), mermaid, max_per_row, truncate, &config),
        Command::Graph { output } => commands::graph::run(output.as_deref(), &config),
    };

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Copy of `stored` with CLI overrides applied, for this run only.
fn with_overrides(stored: &Config, overrides: &ConfigOverrides) -> Config {
    let mut config = stored.clone();
    config.apply_overrides(overrides);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_do_not_reach_stored_config() {
        let args = Cli::try_parse_from([
            "curgraph",
            "--dataset",
            "/tmp/one_off.json",
            "--config-level",
            "error",
            "config",
            "set",
            "level",
            "info",
        ])
        .unwrap();
        let mut stored = Config::from_defaults();
        let original_dataset = stored.dataset.path.clone();

        let config = with_overrides(&stored, &args.to_config_overrides());
        assert_eq!(config.dataset.path, "/tmp/one_off.json");
        assert_eq!(config.logging.level, "error");

        // What `config set` would persist
        stored.set("level", "info").unwrap();
        assert_eq!(stored.dataset.path, original_dataset);
        assert_eq!(stored.logging.level, "info");
    }
}
