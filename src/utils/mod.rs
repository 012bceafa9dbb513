//! Utility functions and helpers.

pub mod http;
pub mod log;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Make a free-text search term safe to embed in a file name.
pub fn file_name_part(s: &str) -> String {
    s.trim().replace(['/', '\\'], "-")
}
