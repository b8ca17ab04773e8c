//! Report sinks for debug and error reporting.
//!
//! The write stage never formats or routes log output itself; it hands every
//! report to a [`ReportSink`].

mod sink;

pub use sink::{
    CollectingReportSink, NoOpReportSink, ReportEntry, ReportLevel, ReportSink, TracingReportSink,
};

#[cfg(test)]
pub use sink::MockReportSink;

use std::sync::Arc;

/// A report sink shared between a node and its host.
pub type SharedReportSink = Arc<dyn ReportSink>;
