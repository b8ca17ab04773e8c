//! Timestamp rendering for file names.
//!
//! Patterns are strftime-style and rendered with chrono. On top of chrono's
//! directives, `%<n>N` renders the first `n` digits of the fractional second,
//! so `%Y%m%d%H%M%S%4N` yields eighteen digits with tenth-of-millisecond
//! resolution. A bare `%N` renders all nine digits and `%L` renders
//! milliseconds.

use std::fmt::Write as _;
use std::sync::OnceLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Timelike};
use regex::{Captures, Regex};

use crate::errors::{FileWriterError, Result};

/// Default pattern for file name timestamps.
pub const DEFAULT_STAMP_FORMAT: &str = "%Y%m%d%H%M%S%4N";

/// Represents the wall-clock instant used for stamping.
pub type Timestamp = DateTime<Local>;

/// Returns the current local time.
#[must_use]
pub fn now_local() -> Timestamp {
    Local::now()
}

fn fraction_directive() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `%%` is matched first so an escaped percent never starts a directive.
    RE.get_or_init(|| Regex::new(r"%%|%([1-9])?N|%L").unwrap_or_else(|_| unreachable!()))
}

fn fraction_width(caps: &Captures<'_>) -> Option<usize> {
    match &caps[0] {
        "%%" => None,
        "%L" => Some(3),
        _ => Some(caps.get(1).map_or(9, |w| w.as_str().parse().unwrap_or(9))),
    }
}

fn expand_fraction<Tz: TimeZone>(at: &DateTime<Tz>, pattern: &str) -> String {
    let nanos = at.nanosecond() % 1_000_000_000;
    fraction_directive()
        .replace_all(pattern, |caps: &Captures<'_>| match fraction_width(caps) {
            Some(width) => format!("{nanos:09}")[..width].to_string(),
            None => "%%".to_string(),
        })
        .into_owned()
}

/// Formats `at` with a strftime-style pattern.
///
/// # Errors
///
/// Returns `FileWriterError::StampFormat` if the pattern contains a directive
/// chrono cannot render.
pub fn format_stamp<Tz>(at: &DateTime<Tz>, pattern: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let expanded = expand_fraction(at, pattern);
    let items: Vec<Item<'_>> = StrftimeItems::new(&expanded).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FileWriterError::StampFormat(pattern.to_string()));
    }

    let mut rendered = String::with_capacity(expanded.len() + 8);
    write!(rendered, "{}", at.format_with_items(items.iter()))
        .map_err(|_| FileWriterError::StampFormat(pattern.to_string()))?;
    Ok(rendered)
}
