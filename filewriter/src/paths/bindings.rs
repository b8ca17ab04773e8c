//! Process path bindings for symbolic directory tokens.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Token naming this node's private directory.
pub const THIS_NODE: &str = "this_node";

/// Token naming the server's shared base directory.
pub const THIS_SERVER: &str = "this_server";

/// The roots a node may refer to symbolically.
///
/// Bindings are supplied by the host at construction time; nothing here reads
/// the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBindings {
    node_id: String,
    node_dir: PathBuf,
    server_dir: PathBuf,
    extra: BTreeMap<String, PathBuf>,
}

impl PathBindings {
    /// Creates bindings with explicit node and server directories.
    #[must_use]
    pub fn new(
        node_id: impl Into<String>,
        node_dir: impl Into<PathBuf>,
        server_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            node_dir: node_dir.into(),
            server_dir: server_dir.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Creates bindings using the conventional `<server_dir>/nodes/<node_id>` layout.
    #[must_use]
    pub fn for_node(node_id: impl Into<String>, server_dir: impl Into<PathBuf>) -> Self {
        let node_id = node_id.into();
        let server_dir = server_dir.into();
        let node_dir = server_dir.join("nodes").join(&node_id);
        Self::new(node_id, node_dir, server_dir)
    }

    /// Binds an additional named root, e.g. `disk_dir`.
    ///
    /// A leading `@` in `name` is ignored.
    #[must_use]
    pub fn with_root(mut self, name: impl AsRef<str>, dir: impl Into<PathBuf>) -> Self {
        let name = name.as_ref().trim_start_matches('@');
        self.extra.insert(name.to_string(), dir.into());
        self
    }

    /// Returns the node identifier.
    #[must_use]
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Returns this node's private directory.
    #[must_use]
    pub fn node_dir(&self) -> &Path {
        &self.node_dir
    }

    /// Returns the server's shared base directory.
    #[must_use]
    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    /// Looks up the directory bound to `name` (without the leading `@`).
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Path> {
        match name {
            THIS_NODE => Some(&self.node_dir),
            THIS_SERVER => Some(&self.server_dir),
            other => self.extra.get(other).map(PathBuf::as_path),
        }
    }

    /// Returns the names of every bound token.
    pub fn token_names(&self) -> impl Iterator<Item = &str> {
        [THIS_NODE, THIS_SERVER]
            .into_iter()
            .chain(self.extra.keys().map(String::as_str))
    }
}
