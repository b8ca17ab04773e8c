//! Node configuration.
//!
//! A node configuration is a flat JSON object. The writer keys (`dir_path`,
//! `file_name`, `file_mode`, `stamp_format`) drive path resolution; the host
//! keys (`enabled`, `loop_delay`, `debug`) belong to the dispatch loop.
//! Unknown keys are ignored.

mod file_mode;

pub use file_mode::FileMode;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::ConfigError;

/// Settings consumed by the write stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Default destination directory; may start with a path token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_path: Option<String>,
    /// Default file name; may contain `|TIMESTAMP|`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Open mode for the destination file.
    #[serde(default = "default_file_mode")]
    pub file_mode: String,
    /// Pattern used to render `|TIMESTAMP|`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_format: Option<String>,
}

fn default_file_mode() -> String {
    "w".to_string()
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            dir_path: None,
            file_name: None,
            file_mode: default_file_mode(),
            stamp_format: None,
        }
    }
}

impl WriterConfig {
    /// Creates a writer configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default directory.
    #[must_use]
    pub fn with_dir_path(mut self, dir_path: impl Into<String>) -> Self {
        self.dir_path = Some(dir_path.into());
        self
    }

    /// Sets the default file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the open mode.
    #[must_use]
    pub fn with_file_mode(mut self, file_mode: impl Into<String>) -> Self {
        self.file_mode = file_mode.into();
        self
    }

    /// Sets the timestamp pattern.
    #[must_use]
    pub fn with_stamp_format(mut self, stamp_format: impl Into<String>) -> Self {
        self.stamp_format = Some(stamp_format.into());
        self
    }

    /// Returns the configured directory if it is non-empty.
    #[must_use]
    pub fn dir_path(&self) -> Option<&str> {
        non_empty(self.dir_path.as_deref())
    }

    /// Returns the configured file name if it is non-empty.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        non_empty(self.file_name.as_deref())
    }

    /// Returns the configured timestamp pattern if it is non-empty.
    #[must_use]
    pub fn stamp_format(&self) -> Option<&str> {
        non_empty(self.stamp_format.as_deref())
    }
}

/// Settings owned by the dispatch loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Whether the node may run at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds to wait between processing passes.
    #[serde(default)]
    pub loop_delay: f64,
    /// Emits non-forced debug entries when true.
    #[serde(default)]
    pub debug: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            loop_delay: 0.0,
            debug: false,
        }
    }
}

impl HostConfig {
    /// Gets the loop delay as a Duration.
    ///
    /// Negative or non-finite values collapse to zero; values too large for
    /// a `Duration` saturate at `Duration::MAX`.
    #[must_use]
    pub fn loop_delay(&self) -> Duration {
        if self.loop_delay.is_finite() && self.loop_delay > 0.0 {
            Duration::try_from_secs_f64(self.loop_delay).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

/// Complete configuration of one file writer node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Dispatch loop settings.
    #[serde(flatten)]
    pub host: HostConfig,
    /// Write stage settings.
    #[serde(flatten)]
    pub writer: WriterConfig,
}

impl NodeConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the writer settings.
    #[must_use]
    pub fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Replaces the host settings.
    #[must_use]
    pub fn with_host(mut self, host: HostConfig) -> Self {
        self.host = host;
        self
    }

    /// Parses a configuration from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds a configuration from an already parsed JSON value.
    ///
    /// `null` yields the defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
