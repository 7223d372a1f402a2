//! Config command handler

use crate::args::ConfigSubcommand;
use curriculum_graph::config::Config;
use std::io::{self, Write};

/// Dispatch config subcommands; no subcommand prints everything.
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> bool {
    match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => {
            show_all(config);
            true
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => show_key(config, &key),
        Some(ConfigSubcommand::Set { key, value }) => {
            update(config, &key, |c| c.set(&key, &value), &format!("Set {key} = {value}"))
        }
        Some(ConfigSubcommand::Unset { key }) => update(
            config,
            &key,
            |c| c.unset(&key, defaults),
            &format!("Reset {key} to default"),
        ),
        Some(ConfigSubcommand::Reset) => reset(),
    }
}

fn show_all(config: &Config) {
    println!("\n=== Configuration ===");
    println!("({})\n", Config::get_config_file_path().display());
    print!("{config}");
}

fn show_key(config: &Config, key: &str) -> bool {
    match config.get(key) {
        Some(value) => {
            println!("{value}");
            true
        }
        None => {
            eprintln!("✗ Unknown config key: '{key}'");
            false
        }
    }
}

/// Apply `change` and persist the result.
fn update(
    config: &mut Config,
    key: &str,
    change: impl FnOnce(&mut Config) -> Result<(), String>,
    done: &str,
) -> bool {
    if let Err(e) = change(config) {
        eprintln!("✗ {e}");
        return false;
    }
    if let Err(e) = config.save() {
        eprintln!("✗ Failed to save config after changing '{key}': {e}");
        return false;
    }
    println!("✓ {done}");
    true
}

fn reset() -> bool {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return true;
    }

    print!("Reset configuration to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if !matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        println!("✗ Reset cancelled");
        return true;
    }
    match Config::reset() {
        Ok(()) => {
            println!("✓ Config reset to defaults");
            true
        }
        Err(e) => {
            eprintln!("✗ Failed to remove config file: {e}");
            false
        }
    }
}
