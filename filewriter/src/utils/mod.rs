//! Utility functions for timestamp handling.

pub mod timestamps;

pub use timestamps::{format_stamp, now_local, Timestamp, DEFAULT_STAMP_FORMAT};
