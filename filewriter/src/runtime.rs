//! A minimal host loop for running a node from a message channel.
//!
//! The loop mirrors what a pipeline host does for a leaf node: skip disabled
//! nodes, call `startup`, drain once with no message, then process queued
//! messages in batches, pausing `loop_delay` between batches. Processing is
//! synchronous; the loop only awaits on the channel and the delay.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::{HostConfig, NodeConfig};
use crate::core::{StageOutput, StageStatus};
use crate::message::Message;
use crate::paths::PathBindings;
use crate::stages::{Node, WriteStage};

/// Counts of message outcomes over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Messages whose payload was written.
    pub written: usize,
    /// Messages that produced no file without an error.
    pub skipped: usize,
    /// Messages that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Records one output.
    pub fn record(&mut self, output: &StageOutput) {
        match output.status {
            StageStatus::Ok => self.written += 1,
            StageStatus::Skip => self.skipped += 1,
            StageStatus::Fail => self.failed += 1,
        }
    }

    /// Returns the number of messages processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
}

/// Runs `node` until `inbox` is closed and drained.
pub async fn run_node<N: Node>(
    mut node: N,
    host: &HostConfig,
    mut inbox: mpsc::Receiver<Message>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    if !host.enabled {
        info!(node = node.name(), "node disabled, not starting");
        return summary;
    }

    node.startup();
    node.process_message(None);

    let delay = host.loop_delay();
    while let Some(first) = inbox.recv().await {
        summary.record(&node.process_message(Some(&first)));
        while let Ok(msg) = inbox.try_recv() {
            summary.record(&node.process_message(Some(&msg)));
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    info!(
        node = node.name(),
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        "inbox closed"
    );
    summary
}

/// Loads a node configuration file and runs a tracing-backed write stage.
pub async fn launch(
    config_path: impl AsRef<Path>,
    bindings: PathBindings,
    inbox: mpsc::Receiver<Message>,
) -> anyhow::Result<RunSummary> {
    let config_path = config_path.as_ref();
    let config = NodeConfig::from_path(config_path)
        .with_context(|| format!("loading node configuration from {}", config_path.display()))?;

    let host = config.host.clone();
    let stage = WriteStage::with_tracing(config, bindings);
    Ok(run_node(stage, &host, inbox).await)
}
