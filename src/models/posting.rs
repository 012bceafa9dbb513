//! Posting data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque upstream identifier of a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingId(String);

impl PostingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured fields of one fetched posting.
///
/// `None` marks a field whose markup could not be found; it is written as an
/// empty cell. The applicant count has no absent state and falls back to `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRecord {
    pub posting_id: PostingId,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub time_posted: Option<String>,
    pub num_applicants: u32,
}

/// Free-text search parameters for the listing feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    pub location: String,
}

impl SearchQuery {
    pub const DEFAULT_TITLE: &'static str = "Software Developer";

    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
        }
    }
}
