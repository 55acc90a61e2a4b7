//! Importer configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Importer configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `IMPORT_PATH`: document to import (no default)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
#[derive(Debug, Clone)]
pub struct Config {
    pub import_path: Option<PathBuf>,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            import_path: lookup("IMPORT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Overrides the document path with the first positional argument, if any.
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(path) = args.next().filter(|p| !p.is_empty()) {
            self.import_path = Some(PathBuf::from(path));
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            import_path: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}
