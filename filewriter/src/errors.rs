//! Error types for the file writer node.
//!
//! Every failure that can happen while handling a single message is a variant
//! of [`FileWriterError`]. Resolvers return these as values and the write
//! stage reports them once, at its boundary.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for file writer operations.
#[derive(Debug, Error)]
pub enum FileWriterError {
    /// The message context is present but is not a key/value mapping.
    #[error("Invalid message context: expected a mapping, got {0}")]
    InvalidContext(String),

    /// The destination directory could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation {
        /// The directory that was being created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The destination file could not be opened or written.
    #[error("Failed to write file {}: {source}", path.display())]
    Write {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configured open mode does not describe a writable mode.
    #[error("Invalid file mode: {0:?}")]
    InvalidFileMode(String),

    /// A symbolic directory token has no binding.
    #[error("Unknown path token: {0}")]
    UnknownToken(String),

    /// The timestamp pattern cannot be rendered.
    #[error("Invalid timestamp format: {0:?}")]
    StampFormat(String),

    /// A message was offered before the stage was started.
    #[error("Stage {0} has not been started")]
    NotStarted(String),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading node configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = FileWriterError> = std::result::Result<T, E>;
