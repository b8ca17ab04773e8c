//! Path resolution for outgoing files.
//!
//! This module provides:
//! - Path bindings for symbolic directory tokens (`@this_node`, ...)
//! - Token expansion
//! - File name selection with timestamp templating
//! - Destination directory selection and creation

mod bindings;
mod destination;
mod file_name;
mod tokens;

pub use bindings::{PathBindings, THIS_NODE, THIS_SERVER};
pub use destination::{DestinationResolver, DirSource, ResolvedPath, DIR_PATH_KEY};
pub use file_name::{FileNameResolver, FILE_NAME_KEY, TIMESTAMP_PLACEHOLDER};
pub use tokens::TokenResolver;
