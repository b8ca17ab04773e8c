//! Open mode strings.
//!
//! Modes follow the classic `fopen` vocabulary: `w`, `w+`, `a`, `a+`, `r+`,
//! optionally with `x` (exclusive create, write modes only) and a `b` or `t`
//! marker. Anything after a `:` names an external encoding; payload bytes are
//! written verbatim, so it is accepted and ignored.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::errors::FileWriterError;

/// How the destination file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// `w`: create or truncate, write only.
    #[default]
    Write,
    /// `w+`: create or truncate, read and write.
    WriteRead,
    /// `a`: create or append.
    Append,
    /// `a+`: create or append, readable.
    AppendRead,
    /// `r+`: existing file, read and write from the start.
    ReadWrite,
    /// `wx`: create a new file; fails if it already exists.
    CreateNew,
}

impl FileMode {
    /// Returns the `OpenOptions` for this mode.
    #[must_use]
    pub fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Self::Write => {
                options.write(true).create(true).truncate(true);
            }
            Self::WriteRead => {
                options.read(true).write(true).create(true).truncate(true);
            }
            Self::Append => {
                options.append(true).create(true);
            }
            Self::AppendRead => {
                options.read(true).append(true).create(true);
            }
            Self::ReadWrite => {
                options.read(true).write(true);
            }
            Self::CreateNew => {
                options.write(true).create_new(true);
            }
        }
        options
    }

    /// Returns the canonical mode string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Write => "w",
            Self::WriteRead => "w+",
            Self::Append => "a",
            Self::AppendRead => "a+",
            Self::ReadWrite => "r+",
            Self::CreateNew => "wx",
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileMode {
    type Err = FileWriterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || FileWriterError::InvalidFileMode(raw.to_string());

        let access = raw.split(':').next().unwrap_or_default().trim();
        let mut chars = access.chars();
        let base = chars.next().ok_or_else(invalid)?;

        let mut plus = false;
        let mut exclusive = false;
        let mut text_or_binary = false;
        for c in chars {
            match c {
                '+' if !plus => plus = true,
                'x' if !exclusive => exclusive = true,
                'b' | 't' if !text_or_binary => text_or_binary = true,
                _ => return Err(invalid()),
            }
        }

        match (base, plus, exclusive) {
            ('w', false, false) => Ok(Self::Write),
            ('w', true, false) => Ok(Self::WriteRead),
            ('w', _, true) => Ok(Self::CreateNew),
            ('a', false, false) => Ok(Self::Append),
            ('a', true, false) => Ok(Self::AppendRead),
            ('r', true, false) => Ok(Self::ReadWrite),
            _ => Err(invalid()),
        }
    }
}
