//! Storage abstractions for report persistence.
//!
//! A run produces four CSV tables named after the search and the run date:
//!
//! ```text
//! {output_dir}/
//! ├── jobs_{title}_{location}_{date}.csv            # one row per posting
//! ├── skills_{title}_{location}_{date}.csv          # postings per matched skill
//! ├── one_hot_skills_{title}_{location}_{date}.csv  # employers per skill (ragged)
//! └── skill_usage_{title}_{location}_{date}.csv     # distinct employers per skill
//! ```

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};

use crate::error::Result;
use crate::models::SearchQuery;
use crate::pipeline::Report;
use crate::utils::file_name_part;

// Re-export for convenience
pub use local::LocalStorage;

/// Identifies the tables of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName {
    pub title: String,
    pub location: String,
    pub date: NaiveDate,
}

impl ReportName {
    pub fn new(query: &SearchQuery, date: NaiveDate) -> Self {
        Self {
            title: query.title.clone(),
            location: query.location.clone(),
            date,
        }
    }

    /// Name for a run happening today.
    pub fn today(query: &SearchQuery) -> Self {
        Self::new(query, Local::now().date_naive())
    }

    /// `{table}_{title}_{location}_{YYYY-MM-DD}.csv`
    pub fn file_name(&self, table: &str) -> String {
        format!(
            "{}_{}_{}_{}.csv",
            table,
            file_name_part(&self.title),
            file_name_part(&self.location),
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Files written, in table order
    pub files: Vec<PathBuf>,
    /// Timestamp of the write
    pub timestamp: DateTime<Local>,
}

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Persist all tables of a report.
    async fn write_report(&self, report: &Report, name: &ReportName) -> Result<WriteMetadata>;
}
