//! Output artifacts for the rendering collaborator
//!
//! The JSON payload is the contract with an external image renderer; the
//! Mermaid text is a self-contained diagram for Markdown viewers.

pub mod mermaid;

pub use mermaid::MermaidGenerator;

use super::error::Result;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Supported artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    /// Pretty-printed JSON payload
    #[default]
    Json,
    /// Mermaid flowchart text
    Mermaid,
}

impl RenderFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Mermaid => "md",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "mermaid" | "md" | "markdown" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown render format: {s}")),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Mermaid => write!(f, "mermaid"),
        }
    }
}

/// Serialize `value` as pretty JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `contents` to `path`, creating parent directories.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<RenderFormat>(), Ok(RenderFormat::Json));
        assert_eq!("md".parse::<RenderFormat>(), Ok(RenderFormat::Mermaid));
        assert!("png".parse::<RenderFormat>().is_err());
        assert_eq!(RenderFormat::Mermaid.extension(), "md");
        assert_eq!(RenderFormat::Json.to_string(), "json");
    }
}
