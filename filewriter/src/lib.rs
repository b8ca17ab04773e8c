//! # Filewriter
//!
//! A leaf pipeline node that writes message payloads to files.
//!
//! For every message the node works out where the payload belongs:
//!
//! - **File name**: the context's `file_name`, else the configured one, else a
//!   generated `<node_id>_<stamp>_in`; `|TIMESTAMP|` is expanded in chosen names
//! - **Directory**: the context's `dir_path`, else the configured one, else the
//!   node's private directory; leading tokens such as `@this_node` are expanded
//! - **Write**: the directory is created if needed and the payload is written
//!   verbatim using the configured open mode
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filewriter::prelude::*;
//!
//! let config = NodeConfig::from_json_str(r#"{"dir_path": "@disk_dir/inbound"}"#)?;
//! let bindings = PathBindings::for_node("fw-1", "/srv/xeno").with_root("disk_dir", "/mnt/disk");
//!
//! let mut stage = WriteStage::with_tracing(config, bindings);
//! stage.startup();
//! let output = stage.process_message(Some(&Message::new("hello")));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod message;
pub mod observability;
pub mod paths;
pub mod runtime;
pub mod stages;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{FileMode, HostConfig, NodeConfig, WriterConfig};
    pub use crate::core::{LifecycleState, StageOutput, StageStatus};
    pub use crate::errors::{ConfigError, FileWriterError};
    pub use crate::events::{
        CollectingReportSink, NoOpReportSink, ReportSink, SharedReportSink, TracingReportSink,
    };
    pub use crate::message::{Message, MessageContext};
    pub use crate::paths::{
        DestinationResolver, FileNameResolver, PathBindings, ResolvedPath, TokenResolver,
    };
    pub use crate::runtime::{launch, run_node, RunSummary};
    pub use crate::stages::{Node, WriteStage};
}
