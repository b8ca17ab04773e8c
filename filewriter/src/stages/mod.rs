//! Node trait and the file write stage.
//!
//! A node is driven by a host loop: `startup` once, then `process_message`
//! for every inbound message. Processing is synchronous and never panics on
//! bad input; failures are reported and summarized in the returned output.

mod writer;

pub use writer::WriteStage;

use std::fmt::Debug;

use crate::core::{LifecycleState, StageOutput};
use crate::message::Message;

/// Trait for pipeline nodes consuming messages.
pub trait Node: Send + Debug {
    /// Returns the name of the node.
    fn name(&self) -> &str;

    /// Returns the current lifecycle state.
    fn state(&self) -> LifecycleState;

    /// Prepares the node for processing. Calling it again is harmless.
    fn startup(&mut self);

    /// Processes one message.
    ///
    /// `None` is passed while the host drains its queue before any real
    /// message exists and must be a no-op.
    fn process_message(&mut self, msg: Option<&Message>) -> StageOutput;
}
