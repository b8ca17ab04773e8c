//! Per-message output with factory methods.

use super::StageStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// The output of processing one message.
///
/// Outputs are informational: by the time one is returned, any failure has
/// already been reported to the node's report sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    /// The outcome.
    pub status: StageStatus,

    /// Output data (for written payloads).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, serde_json::Value>>,

    /// Error message (for failed messages).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Skip reason (for skipped messages).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl StageOutput {
    /// Creates a successful output with data.
    #[must_use]
    pub fn ok(data: HashMap<String, serde_json::Value>) -> Self {
        Self {
            status: StageStatus::Ok,
            data: Some(data),
            error: None,
            skip_reason: None,
        }
    }

    /// Creates the output for a completed write.
    #[must_use]
    pub fn written(path: &Path, bytes: usize) -> Self {
        let mut data = HashMap::new();
        data.insert("path".to_string(), serde_json::json!(path.to_string_lossy()));
        data.insert("bytes".to_string(), serde_json::json!(bytes));
        Self::ok(data)
    }

    /// Creates a skip output with a reason.
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Skip,
            data: None,
            error: None,
            skip_reason: Some(reason.into()),
        }
    }

    /// Creates a failure output with an error message.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Fail,
            data: None,
            error: Some(error.into()),
            skip_reason: None,
        }
    }

    /// Returns true if the output indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the output indicates failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    /// Gets a value from the data.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.as_ref().and_then(|d| d.get(key))
    }

    /// Returns the written path, if any.
    #[must_use]
    pub fn written_path(&self) -> Option<&str> {
        self.get("path").and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_output() {
        let output = StageOutput::written(Path::new("/tmp/out/hello.txt"), 2);
        assert_eq!(output.status, StageStatus::Ok);
        assert!(output.is_success());
        assert_eq!(output.written_path(), Some("/tmp/out/hello.txt"));
        assert_eq!(output.get("bytes"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_skip_output() {
        let output = StageOutput::skip("no payload");
        assert_eq!(output.status, StageStatus::Skip);
        assert_eq!(output.skip_reason.as_deref(), Some("no payload"));
        assert!(output.is_success());
        assert!(output.written_path().is_none());
    }

    #[test]
    fn test_fail_output() {
        let output = StageOutput::fail("disk full");
        assert_eq!(output.status, StageStatus::Fail);
        assert_eq!(output.error.as_deref(), Some("disk full"));
        assert!(output.is_failure());
    }

    #[test]
    fn test_serialization() {
        let output = StageOutput::written(Path::new("x.txt"), 1);
        let json = serde_json::to_string(&output).unwrap();
        let deserialized: StageOutput = serde_json::from_str(&json).unwrap();

        assert_eq!(output.status, deserialized.status);
        assert_eq!(output.written_path(), deserialized.written_path());
    }
}
