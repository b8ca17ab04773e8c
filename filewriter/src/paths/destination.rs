//! Destination directory resolution and path composition.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{FileNameResolver, TokenResolver, THIS_NODE};
use crate::config::WriterConfig;
use crate::errors::{FileWriterError, Result};
use crate::message::MessageContext;
use crate::utils::{now_local, Timestamp};

/// Context key overriding the configured directory.
pub const DIR_PATH_KEY: &str = "dir_path";

/// Where the destination directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirSource {
    /// The message context's `dir_path`.
    Context,
    /// The configured `dir_path`.
    Config,
    /// The node's private directory.
    Default,
}

impl fmt::Display for DirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => write!(f, "context"),
            Self::Config => write!(f, "config"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The directory and file name chosen for one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The destination directory, already created unless blank.
    pub directory: PathBuf,
    /// The destination file name.
    pub file_name: String,
    /// Which fallback produced the directory.
    pub source: DirSource,
}

impl ResolvedPath {
    /// Returns the directory joined with the file name.
    ///
    /// The file name always lands inside the directory: leading separators
    /// are dropped rather than letting an absolute name replace the
    /// directory. A blank directory leaves the file name as given.
    #[must_use]
    pub fn full_path(&self) -> PathBuf {
        if self.directory.as_os_str().is_empty() {
            return PathBuf::from(&self.file_name);
        }
        let relative = self.file_name.trim_start_matches(std::path::is_separator);
        self.directory.join(relative)
    }
}

/// Resolves destination directories and full output paths.
#[derive(Debug, Clone)]
pub struct DestinationResolver {
    tokens: TokenResolver,
    file_names: FileNameResolver,
}

impl DestinationResolver {
    /// Creates a resolver expanding tokens with `tokens`.
    #[must_use]
    pub fn new(tokens: TokenResolver) -> Self {
        Self {
            tokens,
            file_names: FileNameResolver::new(),
        }
    }

    /// Returns the token resolver.
    #[must_use]
    pub const fn tokens(&self) -> &TokenResolver {
        &self.tokens
    }

    /// Picks the destination directory without touching the filesystem.
    ///
    /// Order: context `dir_path`, configured `dir_path`, then `@this_node`.
    #[must_use]
    pub fn select_dir(
        &self,
        context: &MessageContext,
        config: &WriterConfig,
    ) -> (String, DirSource) {
        let (raw, source) = context
            .get_str(DIR_PATH_KEY)
            .map(|raw| (raw, DirSource::Context))
            .or_else(|| config.dir_path().map(|raw| (raw, DirSource::Config)))
            .unwrap_or(("", DirSource::Default));

        if source == DirSource::Default {
            return (self.tokens.resolve(&format!("@{THIS_NODE}")), source);
        }

        match self.tokens.try_resolve(raw) {
            Ok(dir) => (dir, source),
            Err(err) => {
                let known: Vec<&str> = self.tokens.bindings().token_names().collect();
                tracing::debug!(
                    dir_path = %raw,
                    error = %err,
                    known = ?known,
                    "leaving path token unexpanded"
                );
                (raw.to_string(), source)
            }
        }
    }

    /// Resolves the destination directory and makes sure it exists.
    ///
    /// # Errors
    ///
    /// Returns `FileWriterError::DirectoryCreation` if the directory is
    /// missing and cannot be created.
    pub fn resolve_dir(
        &self,
        context: &MessageContext,
        config: &WriterConfig,
    ) -> Result<(PathBuf, DirSource)> {
        let (dir, source) = self.select_dir(context, config);
        let dir = PathBuf::from(dir);
        ensure_dir(&dir)?;
        Ok((dir, source))
    }

    /// Resolves the full destination for one message.
    pub fn resolve_path(
        &self,
        context: &MessageContext,
        config: &WriterConfig,
    ) -> Result<ResolvedPath> {
        self.resolve_path_at(context, config, &now_local())
    }

    /// Resolves the full destination for one message at a fixed instant.
    pub fn resolve_path_at(
        &self,
        context: &MessageContext,
        config: &WriterConfig,
        now: &Timestamp,
    ) -> Result<ResolvedPath> {
        let node_id = self.tokens.bindings().node_id();
        let file_name = self.file_names.resolve_at(context, config, node_id, now)?;
        let (directory, source) = self.resolve_dir(context, config)?;

        Ok(ResolvedPath {
            directory,
            file_name,
            source,
        })
    }
}

/// Creates `dir` and any missing parents; blank paths are left alone.
fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().to_string_lossy().trim().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| FileWriterError::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PathBindings;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn resolver(root: &Path) -> DestinationResolver {
        let bindings =
            PathBindings::for_node("fw-1", root).with_root("disk_dir", root.join("disk"));
        DestinationResolver::new(TokenResolver::new(bindings))
    }

    #[test]
    fn test_context_dir_wins() {
        let tmp = TempDir::new().unwrap();
        let ctx_dir = tmp.path().join("from_ctx");
        let config =
            WriterConfig::new().with_dir_path(tmp.path().join("from_cfg").to_string_lossy());
        let ctx: MessageContext = json!({"dir_path": ctx_dir.to_string_lossy()}).into();

        let (dir, source) = resolver(tmp.path()).resolve_dir(&ctx, &config).unwrap();
        assert_eq!(dir, ctx_dir);
        assert_eq!(source, DirSource::Context);
        assert!(ctx_dir.is_dir());
        assert!(!tmp.path().join("from_cfg").exists());
    }

    #[test]
    fn test_config_dir_with_token() {
        let tmp = TempDir::new().unwrap();
        let config = WriterConfig::new().with_dir_path("@disk_dir/inbound");

        let (dir, source) = resolver(tmp.path())
            .resolve_dir(&MessageContext::Absent, &config)
            .unwrap();
        assert_eq!(dir, tmp.path().join("disk").join("inbound"));
        assert_eq!(source, DirSource::Config);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_context_token_expanded() {
        let tmp = TempDir::new().unwrap();
        let ctx: MessageContext = json!({"dir_path": "@this_server/shared"}).into();

        let (dir, _) = resolver(tmp.path()).resolve_dir(&ctx, &WriterConfig::new()).unwrap();
        assert_eq!(dir, tmp.path().join("shared"));
    }

    #[test]
    fn test_default_is_node_dir() {
        let tmp = TempDir::new().unwrap();
        let ctx = MessageContext::Other(json!("not a map"));

        let (dir, source) = resolver(tmp.path()).resolve_dir(&ctx, &WriterConfig::new()).unwrap();
        assert_eq!(dir, tmp.path().join("nodes").join("fw-1"));
        assert_eq!(source, DirSource::Default);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_creates_nested_missing_dirs() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("a").join("b").join("c");
        let ctx: MessageContext = json!({"dir_path": deep.to_string_lossy()}).into();

        resolver(tmp.path()).resolve_dir(&ctx, &WriterConfig::new()).unwrap();
        assert!(deep.is_dir());
    }

    #[test]
    fn test_blank_dir_skips_creation() {
        let bindings = PathBindings::new("fw-1", "", "");
        let resolver = DestinationResolver::new(TokenResolver::new(bindings));
        let resolved = resolver
            .resolve_path(&MessageContext::Absent, &WriterConfig::new().with_file_name("x.txt"))
            .unwrap();
        assert_eq!(resolved.directory, PathBuf::new());
        assert_eq!(resolved.full_path(), PathBuf::from("x.txt"));
    }

    #[test]
    fn test_directory_creation_failure() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"file, not a dir").unwrap();
        let ctx: MessageContext = json!({"dir_path": blocker.join("out").to_string_lossy()}).into();

        let err = resolver(tmp.path())
            .resolve_dir(&ctx, &WriterConfig::new())
            .unwrap_err();
        assert!(matches!(err, FileWriterError::DirectoryCreation { .. }));
    }

    #[test]
    fn test_unknown_token_is_literal_directory() {
        let tmp = TempDir::new().unwrap();
        let resolver = resolver(tmp.path());
        let config = WriterConfig::new().with_dir_path("@nowhere/out");

        let (dir, source) = resolver.select_dir(&MessageContext::Absent, &config);
        assert_eq!(dir, "@nowhere/out");
        assert_eq!(source, DirSource::Config);
    }

    #[test]
    fn test_resolve_path_joins() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let ctx: MessageContext =
            json!({"dir_path": out.to_string_lossy(), "file_name": "hello.txt"}).into();

        let resolved = resolver(tmp.path()).resolve_path(&ctx, &WriterConfig::new()).unwrap();
        assert_eq!(resolved.full_path(), out.join("hello.txt"));
        assert_eq!(resolved.file_name, "hello.txt");
    }

    #[test]
    fn test_absolute_file_name_stays_in_directory() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let escaped = tmp.path().join("escaped.txt");
        let ctx: MessageContext = json!({
            "dir_path": out.to_string_lossy(),
            "file_name": escaped.to_string_lossy()
        })
        .into();

        let resolved = resolver(tmp.path()).resolve_path(&ctx, &WriterConfig::new()).unwrap();
        let full = resolved.full_path();
        assert!(full.starts_with(&out));
        assert!(full.ends_with("escaped.txt"));
        assert_ne!(full, escaped);
    }

    #[test]
    fn test_full_path_keeps_relative_segments() {
        let resolved = ResolvedPath {
            directory: PathBuf::from("/data/out"),
            file_name: "//sub/../x.txt".to_string(),
            source: DirSource::Config,
        };
        assert_eq!(resolved.full_path(), PathBuf::from("/data/out/sub/../x.txt"));
    }
}
