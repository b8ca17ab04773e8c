//! Output file name resolution.

use crate::config::WriterConfig;
use crate::errors::Result;
use crate::message::MessageContext;
use crate::utils::{format_stamp, now_local, Timestamp, DEFAULT_STAMP_FORMAT};

/// Placeholder replaced by the current time in configured file names.
pub const TIMESTAMP_PLACEHOLDER: &str = "|TIMESTAMP|";

/// Context key overriding the configured file name.
pub const FILE_NAME_KEY: &str = "file_name";

/// Picks the file name for a single write.
///
/// The first non-empty source wins: the message context, then the
/// configuration, then a generated `<node_id>_<stamp>_in` name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameResolver;

impl FileNameResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves the file name against the current local time.
    pub fn resolve(
        &self,
        context: &MessageContext,
        config: &WriterConfig,
        node_id: &str,
    ) -> Result<String> {
        self.resolve_at(context, config, node_id, &now_local())
    }

    /// Resolves the file name against a fixed instant.
    ///
    /// # Errors
    ///
    /// Returns `FileWriterError::StampFormat` if a templated name is chosen
    /// and the stamp pattern cannot be rendered.
    pub fn resolve_at(
        &self,
        context: &MessageContext,
        config: &WriterConfig,
        node_id: &str,
        now: &Timestamp,
    ) -> Result<String> {
        let chosen = context.get_str(FILE_NAME_KEY).or_else(|| config.file_name());

        match chosen {
            Some(name) if name.contains(TIMESTAMP_PLACEHOLDER) => {
                let pattern = config.stamp_format().unwrap_or(DEFAULT_STAMP_FORMAT);
                let stamp = format_stamp(now, pattern)?;
                Ok(name.replace(TIMESTAMP_PLACEHOLDER, &stamp))
            }
            Some(name) => Ok(name.to_string()),
            None => {
                let stamp = format_stamp(now, DEFAULT_STAMP_FORMAT)?;
                Ok(format!("{node_id}_{stamp}_in"))
            }
        }
    }
}
