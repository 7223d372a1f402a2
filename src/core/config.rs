//! Configuration module for `curriculum-graph`

use super::layout::LayoutOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the configuration directory in path values
const DIR_VARIABLE: &str = "$CURGRAPH";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the JSON dataset file
    #[serde(default)]
    pub path: String,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for generated artifacts (layouts, diagrams)
    #[serde(default)]
    pub out_dir: String,
}

/// Root layout configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum roots per grid row
    #[serde(default)]
    pub max_per_row: usize,
    /// Maximum title length in labels
    #[serde(default)]
    pub truncate_title: usize,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Dataset settings
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Layout settings
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override dataset path
    pub dataset: Option<String>,
    /// Override output directory
    pub out_dir: Option<String>,
}

impl Config {
    /// Get the `$CURGRAPH` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/curgraph`
    /// - macOS: `~/Library/Application Support/curgraph`
    /// - Windows: `%APPDATA%\curgraph`
    #[must_use]
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("curgraph")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Empty strings and zero layout values are considered missing.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        fn fill(target: &mut String, default: &str) -> bool {
            if target.is_empty() && !default.is_empty() {
                default.clone_into(target);
                return true;
            }
            false
        }
        fn fill_count(target: &mut usize, default: usize) -> bool {
            if *target == 0 && default != 0 {
                *target = default;
                return true;
            }
            false
        }

        let mut changed = fill(&mut self.logging.level, &defaults.logging.level);
        changed |= fill(&mut self.logging.file, &defaults.logging.file);
        changed |= fill(&mut self.dataset.path, &defaults.dataset.path);
        changed |= fill(&mut self.paths.out_dir, &defaults.paths.out_dir);
        changed |= fill_count(&mut self.layout.max_per_row, defaults.layout.max_per_row);
        changed |= fill_count(
            &mut self.layout.truncate_title,
            defaults.layout.truncate_title,
        );
        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides change this run only; the configuration file is not touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(dataset) = &overrides.dataset {
            self.dataset.path.clone_from(dataset);
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
    }

    /// Layout options from the `[layout]` section, with built-in fallbacks for zero values
    #[must_use]
    pub fn layout_options(&self) -> LayoutOptions {
        let fallback = LayoutOptions::default();
        LayoutOptions {
            max_per_row: if self.layout.max_per_row == 0 {
                fallback.max_per_row
            } else {
                self.layout.max_per_row
            },
            truncate_title: if self.layout.truncate_title == 0 {
                fallback.truncate_title
            } else {
                self.layout.truncate_title
            },
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_config_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CURGRAPH` to the configuration directory
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_config_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing sections and fields use their serde defaults; `$CURGRAPH` is expanded
    /// in path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.dataset.path = Self::expand_variables(&config.dataset.path);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults
    /// are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file gets missing fields merged in from the defaults (and is
    /// re-saved if anything changed). On first run the defaults are written out.
    /// Any read or parse failure falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        match fs::read_to_string(&config_file)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_toml(&content).map_err(|e| e.to_string()))
        {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            Err(e) => {
                crate::warn!(
                    "Ignoring unreadable config {}: {e}",
                    config_file.display()
                );
                defaults
            }
        }
    }

    /// Save configuration to the platform-specific config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory cannot
    /// be created, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `dataset`, `out_dir`,
    /// `max_per_row`, `truncate_title` (dashes are accepted in place of underscores).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key.replace('-', "_").as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "dataset" => Some(self.dataset.path.clone()),
            "out_dir" => Some(self.paths.out_dir.clone()),
            "max_per_row" => Some(self.layout.max_per_row.to_string()),
            "truncate_title" => Some(self.layout.truncate_title.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => value.clone_into(&mut self.logging.level),
            "file" => value.clone_into(&mut self.logging.file),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "dataset" => value.clone_into(&mut self.dataset.path),
            "out_dir" => value.clone_into(&mut self.paths.out_dir),
            "max_per_row" => self.layout.max_per_row = parse_count(key, value)?,
            "truncate_title" => self.layout.truncate_title = parse_count(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to its default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "dataset" => self.dataset.path.clone_from(&defaults.dataset.path),
            "out_dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            "max_per_row" => self.layout.max_per_row = defaults.layout.max_per_row,
            "truncate_title" => self.layout.truncate_title = defaults.layout.truncate_title,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid positive integer for '{key}': '{value}'")),
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[dataset]")?;
        writeln!(f, "  path = \"{}\"", self.dataset.path)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;

        writeln!(f, "\n[layout]")?;
        writeln!(f, "  max_per_row = {}", self.layout.max_per_row)?;
        writeln!(f, "  truncate_title = {}", self.layout.truncate_title)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = Config::from_defaults();
        assert!(!config.logging.level.is_empty());
        assert!(!config.dataset.path.is_empty());
        assert_eq!(config.layout.max_per_row, 8);
        assert!(!config.dataset.path.contains(DIR_VARIABLE));
    }

    #[test]
    fn test_layout_options_fall_back_on_zero() {
        let config = Config::default();
        assert_eq!(config.layout_options(), LayoutOptions::default());
    }

    #[test]
    fn test_set_rejects_zero_count() {
        let mut config = Config::default();
        assert!(config.set("max-per-row", "0").is_err());
        assert!(config.set("max_per_row", "abc").is_err());
        assert!(config.set("max_per_row", "4").is_ok());
        assert_eq!(config.get("max-per-row"), Some("4".to_string()));
    }
}
