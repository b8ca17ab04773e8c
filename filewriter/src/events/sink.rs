//! Report sink trait and implementations.

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::errors::FileWriterError;

/// Destination for a node's debug and error reports.
///
/// The write stage calls `debug` on startup and after every write, and
/// `error` for every failure caught at its boundary. Implementations must
/// never panic.
#[cfg_attr(test, mockall::automock)]
pub trait ReportSink: Send + Sync {
    /// Records a debug entry.
    ///
    /// Forced entries are recorded even when debugging is disabled.
    fn debug(&self, message: &str, force: bool);

    /// Records a failure.
    fn error(&self, message: &str, error: &FileWriterError);
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReportSink;

impl ReportSink for NoOpReportSink {
    fn debug(&self, _message: &str, _force: bool) {}

    fn error(&self, _message: &str, _error: &FileWriterError) {}
}

/// A sink that logs through `tracing`.
///
/// Forced entries go out at `INFO`, ordinary entries at `DEBUG` and only when
/// the node's `debug` flag is set. Errors go out at `ERROR`.
#[derive(Debug, Clone)]
pub struct TracingReportSink {
    node_id: String,
    debug_enabled: bool,
}

impl TracingReportSink {
    /// Creates a sink for the given node.
    #[must_use]
    pub fn new(node_id: impl Into<String>, debug_enabled: bool) -> Self {
        Self {
            node_id: node_id.into(),
            debug_enabled,
        }
    }
}

impl ReportSink for TracingReportSink {
    fn debug(&self, message: &str, force: bool) {
        if force {
            info!(node_id = %self.node_id, "{message}");
        } else if self.debug_enabled {
            debug!(node_id = %self.node_id, "{message}");
        }
    }

    fn error(&self, message: &str, err: &FileWriterError) {
        error!(node_id = %self.node_id, error = %err, "{message}");
    }
}

/// Severity of a collected entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    /// A debug entry.
    Debug,
    /// An error entry.
    Error,
}

/// One entry recorded by [`CollectingReportSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Entry severity.
    pub level: ReportLevel,
    /// The reported message.
    pub message: String,
    /// Rendered error, for error entries.
    pub error: Option<String>,
    /// Whether a debug entry was forced.
    pub forced: bool,
}

/// A sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct CollectingReportSink {
    entries: RwLock<Vec<ReportEntry>>,
}

impl CollectingReportSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected entries.
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries.read().clone()
    }

    /// Returns the collected error entries.
    #[must_use]
    pub fn errors(&self) -> Vec<ReportEntry> {
        self.of_level(ReportLevel::Error)
    }

    /// Returns the collected debug entries.
    #[must_use]
    pub fn debugs(&self) -> Vec<ReportEntry> {
        self.of_level(ReportLevel::Debug)
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clears all collected entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn of_level(&self, level: ReportLevel) -> Vec<ReportEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

impl ReportSink for CollectingReportSink {
    fn debug(&self, message: &str, force: bool) {
        self.entries.write().push(ReportEntry {
            level: ReportLevel::Debug,
            message: message.to_string(),
            error: None,
            forced: force,
        });
    }

    fn error(&self, message: &str, error: &FileWriterError) {
        self.entries.write().push(ReportEntry {
            level: ReportLevel::Error,
            message: message.to_string(),
            error: Some(error.to_string()),
            forced: true,
        });
    }
}
