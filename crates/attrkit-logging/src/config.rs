//! Subscriber settings
//!
//! A [`LogConfig`] names a base level, where console events go, an optional
//! JSON-lines file, and per-target levels. The engine crates log under the
//! `attrkit_core` and `attrkit_types` targets, so raising one of those is
//! the usual way to watch supertype fallback or coercion failures.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the subscriber does with events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base level; `RUST_LOG` replaces the whole filter when it is set
    pub level: String,

    /// Console sink, or `None` for no console output
    pub console: Option<ConsoleFormat>,

    /// JSON-lines file sink
    pub file: Option<LogFile>,

    /// Level overrides keyed by target, e.g. `attrkit_types = "debug"`
    pub targets: BTreeMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: Some(ConsoleFormat::Json),
            file: None,
            targets: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// Warnings only, written through the test harness's captured output
    pub fn testing() -> Self {
        Self {
            level: "warn".to_string(),
            console: Some(ConsoleFormat::Captured),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>, level: impl Into<String>) -> Self {
        self.targets.insert(target.into(), level.into());
        self
    }

    /// The filter string handed to `EnvFilter`
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (target, level) in &self.targets {
            directives.push(',');
            directives.push_str(target);
            directives.push('=');
            directives.push_str(level);
        }
        directives
    }
}

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleFormat {
    /// One JSON object per line on stdout
    Json,
    /// Human-readable, colored, on stdout
    Pretty,
    /// Human-readable without color, captured per test by libtest
    Captured,
}

/// A JSON-lines log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
    pub directory: PathBuf,
    /// File name without extension; daily files put the date before `.log`
    pub name: String,
    #[serde(default)]
    pub rolling: FileRolling,
}

impl LogFile {
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            rolling: FileRolling::default(),
        }
    }

    pub fn rolling(mut self, rolling: FileRolling) -> Self {
        self.rolling = rolling;
        self
    }

    /// Path written when the file does not roll
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.log", self.name))
    }
}

/// Whether the log file is replaced by a new one over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileRolling {
    /// One file, truncated when the subscriber starts
    #[default]
    Never,
    /// A new file per day, appended to
    Daily,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_json_console() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.console, Some(ConsoleFormat::Json));
        assert!(config.file.is_none());
        assert_eq!(config.directives(), "info");
    }

    #[test]
    fn test_testing_preset_is_quiet() {
        let config = LogConfig::testing();
        assert_eq!(config.level, "warn");
        assert_eq!(config.console, Some(ConsoleFormat::Captured));
    }

    #[test]
    fn test_directives_are_sorted_by_target() {
        let config = LogConfig::testing()
            .with_target("attrkit_types", "debug")
            .with_target("attrkit_core", "trace");
        assert_eq!(config.directives(), "warn,attrkit_core=trace,attrkit_types=debug");
    }

    #[test]
    fn test_log_file_path() {
        let file = LogFile::new("/tmp/attrkit", "engine");
        assert_eq!(file.rolling, FileRolling::Never);
        assert_eq!(file.path(), PathBuf::from("/tmp/attrkit/engine.log"));
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: LogConfig = serde_json::from_str(
            r#"{
                "console": null,
                "file": {"directory": "logs", "name": "attrkit", "rolling": "daily"},
                "targets": {"attrkit_core": "trace"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.level, "info");
        assert!(config.console.is_none());
        assert_eq!(config.file.as_ref().map(|f| f.rolling), Some(FileRolling::Daily));
        assert_eq!(config.directives(), "info,attrkit_core=trace");
    }
}
