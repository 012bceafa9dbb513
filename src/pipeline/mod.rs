//! Pipeline entry points.
//!
//! - `collect`: walk the feed, fetch postings and tally skills
//! - `Report::build`: turn collected state into report tables
//! - `run_pipeline`: registry → collect → report → storage

pub mod collect;
pub mod report;

pub use collect::{CollectOutcome, collect};
pub use report::{CompanyBreadthRow, EmployerColumn, Report, SkillUsageRow};

use crate::error::Result;
use crate::models::{Config, SearchQuery};
use crate::services::SkillRegistry;
use crate::storage::{ReportName, ReportStorage};
use crate::utils::http::PageFetcher;
use crate::utils::log;

/// Run a full collection and persist its tables.
///
/// The skill registry is loaded before any request is made, so a missing or
/// empty vocabulary fails the run without touching the network.
pub async fn run_pipeline(
    config: &Config,
    fetcher: &dyn PageFetcher,
    storage: &dyn ReportStorage,
    query: &SearchQuery,
    total_wanted: usize,
) -> Result<Report> {
    log::header(&format!(
        "Collecting '{}' postings in '{}'",
        query.title, query.location
    ));

    log::step(1, 3, "Loading skill registry");
    let registry = SkillRegistry::load(&config.paths.skills_file)?;

    log::step(2, 3, "Collecting postings");
    let outcome = collect(config, fetcher, &registry, query, total_wanted).await?;

    log::summary(
        "Collection",
        &[
            ("Pages", outcome.page_total.to_string()),
            ("Failed pages", outcome.page_failures.to_string()),
            ("Postings attempted", outcome.detail_total.to_string()),
            ("Failed postings", outcome.detail_failures.to_string()),
            ("Postings without description", outcome.bodies_missing.to_string()),
        ],
    );

    log::step(3, 3, "Writing report tables");
    let report = Report::build(outcome.postings, &outcome.counter);
    let written = storage
        .write_report(&report, &ReportName::today(query))
        .await?;

    log::sub_item(&format!(
        "{} tables written at {}",
        written.files.len(),
        written.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));

    Ok(report)
}
