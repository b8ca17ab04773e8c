//! Symbolic directory token expansion.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::PathBindings;
use crate::errors::{FileWriterError, Result};

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^@([A-Za-z0-9_]+)(?:$|[/\\])").unwrap_or_else(|_| unreachable!())
    })
}

/// Expands a leading `@name` token against the process path bindings.
///
/// Only a token at the very start of the string, followed by the end of the
/// string or a path separator, is recognized. Unknown tokens pass through
/// unchanged from [`TokenResolver::resolve`]; use
/// [`TokenResolver::try_resolve`] to detect them.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    bindings: Arc<PathBindings>,
}

impl TokenResolver {
    /// Creates a resolver over the given bindings.
    #[must_use]
    pub fn new(bindings: impl Into<Arc<PathBindings>>) -> Self {
        Self {
            bindings: bindings.into(),
        }
    }

    /// Returns the bindings this resolver expands against.
    #[must_use]
    pub fn bindings(&self) -> &PathBindings {
        &self.bindings
    }

    /// Returns the token name at the start of `raw`, if any.
    #[must_use]
    pub fn leading_token(raw: &str) -> Option<&str> {
        token_pattern()
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Expands `raw`, failing on an unbound token.
    ///
    /// # Errors
    ///
    /// Returns `FileWriterError::UnknownToken` if `raw` starts with a token
    /// that has no binding.
    pub fn try_resolve(&self, raw: &str) -> Result<String> {
        let Some(name) = Self::leading_token(raw) else {
            return Ok(raw.to_string());
        };
        let dir = self
            .bindings
            .lookup(name)
            .ok_or_else(|| FileWriterError::UnknownToken(format!("@{name}")))?;

        let rest = &raw[name.len() + 1..];
        Ok(format!("{}{rest}", dir.to_string_lossy()))
    }

    /// Expands `raw`, leaving unknown tokens untouched.
    ///
    /// Empty input is returned as is.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> String {
        self.try_resolve(raw).unwrap_or_else(|_| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> TokenResolver {
        TokenResolver::new(
            PathBindings::new("fw-1", "/srv/nodes/fw-1", "/srv").with_root("disk_dir", "/mnt/disk"),
        )
    }

    #[test]
    fn test_expand_builtin_tokens() {
        let r = resolver();
        assert_eq!(r.resolve("@this_node"), "/srv/nodes/fw-1");
        assert_eq!(r.resolve("@this_server/shared"), "/srv/shared");
    }

    #[test]
    fn test_expand_extra_root() {
        assert_eq!(resolver().resolve("@disk_dir/inbound"), "/mnt/disk/inbound");
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(resolver().resolve(""), "");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let r = resolver();
        assert_eq!(r.resolve("@elsewhere/out"), "@elsewhere/out");
        assert!(matches!(
            r.try_resolve("@elsewhere/out"),
            Err(FileWriterError::UnknownToken(t)) if t == "@elsewhere"
        ));
    }

    #[test]
    fn test_token_must_be_whole_segment() {
        let r = resolver();
        assert_eq!(r.resolve("@this_node.bak"), "@this_node.bak");
        assert_eq!(r.resolve("/data/@this_node"), "/data/@this_node");
    }

    #[test]
    fn test_idempotent_on_expanded_paths() {
        let r = resolver();
        for raw in ["@this_node/out", "@disk_dir", "/tmp/out", "relative/dir"] {
            let once = r.resolve(raw);
            assert_eq!(r.resolve(&once), once);
        }
    }

    #[test]
    fn test_leading_token() {
        assert_eq!(TokenResolver::leading_token("@disk_dir/x"), Some("disk_dir"));
        assert_eq!(TokenResolver::leading_token("@/x"), None);
        assert_eq!(TokenResolver::leading_token("disk_dir"), None);
    }
}
