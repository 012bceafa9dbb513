//! Local filesystem storage implementation.
//!
//! Each table is encoded as CSV in memory and written atomically (temp file,
//! then rename), so an interrupted run never leaves a half-written table.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::pipeline::{EmployerColumn, Report};
use crate::storage::{ReportName, ReportStorage, WriteMetadata};

pub const JOBS_TABLE: &str = "jobs";
pub const SKILLS_TABLE: &str = "skills";
pub const EMPLOYERS_TABLE: &str = "one_hot_skills";
pub const BREADTH_TABLE: &str = "skill_usage";

const JOBS_HEADERS: [&str; 6] = [
    "posting_id",
    "job_title",
    "company_name",
    "location",
    "time_posted",
    "num_applicants",
];
const SKILLS_HEADERS: [&str; 2] = ["Programming Skill", "Number of Job Postings"];
const BREADTH_HEADERS: [&str; 2] = ["Programming Skill", "Number of Companies"];

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a file name.
    fn path(&self, file_name: &str) -> PathBuf {
        self.root_dir.join(file_name)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(file_name);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }
}

#[async_trait]
impl ReportStorage for LocalStorage {
    async fn write_report(&self, report: &Report, name: &ReportName) -> Result<WriteMetadata> {
        let tables = [
            (JOBS_TABLE, encode_rows(&JOBS_HEADERS, &report.postings)?),
            (SKILLS_TABLE, encode_rows(&SKILLS_HEADERS, &report.skill_usage)?),
            (
                EMPLOYERS_TABLE,
                encode_employers(&report.employers, report.employer_rows())?,
            ),
            (
                BREADTH_TABLE,
                encode_rows(&BREADTH_HEADERS, &report.company_breadth)?,
            ),
        ];

        let mut files = Vec::with_capacity(tables.len());
        for (table, bytes) in tables {
            let path = self.write_bytes(&name.file_name(table), &bytes).await?;
            log::info!("Wrote {}", path.display());
            files.push(path);
        }

        Ok(WriteMetadata {
            files,
            timestamp: Local::now(),
        })
    }
}

/// Header row followed by one serialized row per item; the header is written
/// even when there are no rows.
fn encode_rows<T: Serialize>(headers: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    finish(writer)
}

/// One column per skill; shorter columns are padded with empty cells, as are
/// postings without a known employer.
fn encode_employers(columns: &[EmployerColumn], height: usize) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| c.skill.as_str()))?;
    for row in 0..height {
        writer.write_record(columns.iter().map(|c| {
            c.employers
                .get(row)
                .and_then(|e| e.as_deref())
                .unwrap_or("")
        }))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}
