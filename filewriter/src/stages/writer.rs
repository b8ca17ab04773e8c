//! The write stage: resolves a destination and writes the payload there.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Node;
use crate::config::{FileMode, NodeConfig};
use crate::core::{LifecycleState, StageOutput};
use crate::errors::{FileWriterError, Result};
use crate::events::{SharedReportSink, TracingReportSink};
use crate::message::{Message, MessageContext};
use crate::observability::WriteTimer;
use crate::paths::{DestinationResolver, PathBindings, ResolvedPath, TokenResolver};

/// Writes each message payload to a file chosen from context and config.
///
/// The destination is recomputed for every message. Failures are reported to
/// the sink and never leave the stage, which keeps accepting messages.
pub struct WriteStage {
    config: Arc<NodeConfig>,
    destinations: DestinationResolver,
    sink: SharedReportSink,
    state: LifecycleState,
}

impl fmt::Debug for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteStage")
            .field("node_id", &self.node_id())
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WriteStage {
    /// Creates a stage reporting to `sink`.
    #[must_use]
    pub fn new(
        config: impl Into<Arc<NodeConfig>>,
        bindings: PathBindings,
        sink: SharedReportSink,
    ) -> Self {
        Self {
            config: config.into(),
            destinations: DestinationResolver::new(TokenResolver::new(bindings)),
            sink,
            state: LifecycleState::Idle,
        }
    }

    /// Creates a stage reporting through `tracing`.
    #[must_use]
    pub fn with_tracing(config: impl Into<Arc<NodeConfig>>, bindings: PathBindings) -> Self {
        let config = config.into();
        let sink = Arc::new(TracingReportSink::new(bindings.node_id(), config.host.debug));
        Self::new(config, bindings, sink)
    }

    /// Returns the node identifier.
    #[must_use]
    pub fn node_id(&self) -> &str {
        self.destinations.tokens().bindings().node_id()
    }

    /// Returns the node configuration.
    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Resolves the destination for a context, creating its directory.
    pub fn resolve_path(&self, context: &MessageContext) -> Result<ResolvedPath> {
        self.destinations.resolve_path(context, &self.config.writer)
    }

    fn handle(&self, msg: &Message) -> Result<Option<(PathBuf, usize)>> {
        if self.state != LifecycleState::Running {
            return Err(FileWriterError::NotStarted(self.node_id().to_string()));
        }

        if let Err(err) = msg.context.validate() {
            self.sink.debug(&format!("ignoring message context: {err}"), false);
        }

        // Resolution runs even without a payload so the directory still exists.
        let resolved = self.resolve_path(&msg.context)?;
        self.sink.debug(
            &format!(
                "file_name: {:?} dir_path: {:?} ({})",
                resolved.file_name,
                resolved.directory.display().to_string(),
                resolved.source
            ),
            true,
        );

        let Some(payload) = msg.payload() else {
            return Ok(None);
        };

        let path = resolved.full_path();
        let mode: FileMode = self.config.writer.file_mode.parse()?;
        write_payload(&path, mode, payload)?;
        Ok(Some((path, payload.len())))
    }
}

fn write_payload(path: &Path, mode: FileMode, payload: &[u8]) -> Result<()> {
    let write_err = |source| FileWriterError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = mode.open_options().open(path).map_err(write_err)?;
    file.write_all(payload).map_err(write_err)
}

impl Node for WriteStage {
    fn name(&self) -> &str {
        self.node_id()
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn startup(&mut self) {
        self.sink.debug(&format!("config: {:?}", self.config), true);
        self.state = LifecycleState::Running;
    }

    fn process_message(&mut self, msg: Option<&Message>) -> StageOutput {
        let Some(msg) = msg else {
            return StageOutput::skip("no message");
        };

        let timer = WriteTimer::start();
        match self.handle(msg) {
            Ok(Some((path, bytes))) => {
                self.sink.debug(&format!("writing file: {:?}", path.display().to_string()), true);
                tracing::debug!(
                    path = %path.display(),
                    bytes,
                    duration_ms = timer.elapsed_ms(),
                    "payload written"
                );
                StageOutput::written(&path, bytes)
            }
            Ok(None) => StageOutput::skip("message has no payload"),
            Err(err) => {
                self.sink.error("failed to process message", &err);
                StageOutput::fail(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WriterConfig;
    use crate::core::StageStatus;
    use crate::events::{CollectingReportSink, MockReportSink};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn stage_with(root: &Path, writer: WriterConfig) -> (WriteStage, Arc<CollectingReportSink>) {
        let sink = Arc::new(CollectingReportSink::new());
        let config = NodeConfig::new().with_writer(writer);
        let stage = WriteStage::new(config, PathBindings::for_node("fw-1", root), sink.clone());
        (stage, sink)
    }

    #[test]
    fn test_startup_transitions_and_reports_config() {
        let tmp = TempDir::new().unwrap();
        let (mut stage, sink) = stage_with(tmp.path(), WriterConfig::new());
        assert_eq!(stage.state(), LifecycleState::Idle);

        stage.startup();
        assert_eq!(stage.state(), LifecycleState::Running);

        let debugs = sink.debugs();
        assert_eq!(debugs.len(), 1);
        assert!(debugs[0].forced);
        assert!(debugs[0].message.starts_with("config: "));
    }

    #[test]
    fn test_none_message_is_noop() {
        let tmp = TempDir::new().unwrap();
        let (mut stage, sink) = stage_with(tmp.path(), WriterConfig::new());

        let output = stage.process_message(None);
        assert_eq!(output.status, StageStatus::Skip);
        assert!(sink.is_empty());
        assert!(!tmp.path().join("nodes").exists());
    }

    #[test]
    fn test_message_before_startup_fails() {
        let tmp = TempDir::new().unwrap();
        let (mut stage, sink) = stage_with(tmp.path(), WriterConfig::new());

        let output = stage.process_message(Some(&Message::new("hi")));
        assert!(output.is_failure());
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn test_writes_payload_verbatim() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let (mut stage, sink) = stage_with(tmp.path(), WriterConfig::new());
        stage.startup();

        let msg = Message::new(&b"line one\r\nno newline at end"[..])
            .with_context(json!({"dir_path": out.to_string_lossy(), "file_name": "raw.bin"}));
        let output = stage.process_message(Some(&msg));

        assert!(output.is_success());
        let path = out.join("raw.bin");
        assert_eq!(output.written_path(), Some(path.to_string_lossy().as_ref()));
        assert_eq!(std::fs::read(&path).unwrap(), b"line one\r\nno newline at end");
        assert!(sink.errors().is_empty());
        assert!(sink
            .debugs()
            .iter()
            .any(|e| e.forced && e.message.starts_with("writing file: ")));
        assert!(sink
            .debugs()
            .iter()
            .any(|e| e.forced && e.message.starts_with("file_name: \"raw.bin\"")));
    }

    #[test]
    fn test_absolute_file_name_written_under_directory() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let escaped = tmp.path().join("escaped.txt");
        let (mut stage, sink) = stage_with(tmp.path(), WriterConfig::new());
        stage.startup();

        let msg = Message::new("kept inside").with_context(json!({
            "dir_path": out.to_string_lossy(),
            "file_name": escaped.to_string_lossy()
        }));
        let output = stage.process_message(Some(&msg));

        assert!(output.is_success());
        assert!(!escaped.exists());
        let written = PathBuf::from(output.written_path().unwrap());
        assert!(written.starts_with(&out));
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "kept inside");
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn test_default_mode_truncates() {
        let tmp = TempDir::new().unwrap();
        let (mut stage, _) = stage_with(tmp.path(), WriterConfig::new().with_file_name("same.txt"));
        stage.startup();

        stage.process_message(Some(&Message::new("first, longer")));
        stage.process_message(Some(&Message::new("second")));

        let path = tmp.path().join("nodes").join("fw-1").join("same.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_append_mode() {
        let tmp = TempDir::new().unwrap();
        let writer = WriterConfig::new().with_file_name("log.txt").with_file_mode("a");
        let (mut stage, _) = stage_with(tmp.path(), writer);
        stage.startup();

        stage.process_message(Some(&Message::new("a")));
        stage.process_message(Some(&Message::new("b")));

        let path = tmp.path().join("nodes").join("fw-1").join("log.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ab");
    }

    #[test]
    fn test_invalid_mode_reports_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let writer = WriterConfig::new().with_file_name("x.txt").with_file_mode("r");
        let (mut stage, sink) = stage_with(tmp.path(), writer);
        stage.startup();

        let output = stage.process_message(Some(&Message::new("x")));
        assert!(output.is_failure());
        assert!(!tmp.path().join("nodes").join("fw-1").join("x.txt").exists());

        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error.as_deref(), Some("Invalid file mode: \"r\""));
    }

    #[test]
    fn test_no_payload_still_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("warm");
        let (mut stage, sink) = stage_with(tmp.path(), WriterConfig::new());
        stage.startup();

        let msg = Message::without_data(json!({"dir_path": out.to_string_lossy()}));
        let output = stage.process_message(Some(&msg));

        assert_eq!(output.status, StageStatus::Skip);
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn test_invalid_context_is_debug_only() {
        let tmp = TempDir::new().unwrap();
        let (mut stage, sink) =
            stage_with(tmp.path(), WriterConfig::new().with_file_name("ctx.txt"));
        stage.startup();

        let msg = Message::new("data").with_context(json!(["not", "a", "map"]));
        let output = stage.process_message(Some(&msg));

        assert!(output.is_success());
        assert!(tmp.path().join("nodes").join("fw-1").join("ctx.txt").is_file());
        assert!(sink.errors().is_empty());
        assert!(sink
            .debugs()
            .iter()
            .any(|e| !e.forced && e.message.contains("ignoring message context")));
    }

    #[test]
    fn test_failure_reported_once_to_sink() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let mut sink = MockReportSink::new();
        sink.expect_debug().returning(|_, _| ());
        sink.expect_error()
            .withf(|message, err| {
                message == "failed to process message"
                    && matches!(err, FileWriterError::DirectoryCreation { .. })
            })
            .times(1)
            .returning(|_, _| ());

        let config = NodeConfig::new().with_writer(
            WriterConfig::new().with_dir_path(blocker.join("sub").to_string_lossy()),
        );
        let bindings = PathBindings::for_node("fw-1", tmp.path());
        let mut stage = WriteStage::new(config, bindings, Arc::new(sink));
        stage.startup();

        let output = stage.process_message(Some(&Message::new("x")));
        assert!(output.is_failure());
        assert_eq!(stage.state(), LifecycleState::Running);
    }
}
