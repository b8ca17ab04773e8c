//! Core domain model types for the file writer node.
//!
//! This module contains:
//! - Message outcome status and the node lifecycle state
//! - The per-message output type with factory methods

mod output;
mod status;

pub use output::StageOutput;
pub use status::{LifecycleState, StageStatus};
