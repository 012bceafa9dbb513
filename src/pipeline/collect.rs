// src/pipeline/collect.rs

//! Posting collection loop.

use futures::{StreamExt, pin_mut};

use crate::error::Result;
use crate::models::{Config, PostingRecord, SearchQuery};
use crate::services::{
    DetailExtractor, ListingPaginator, RateLimiter, SkillCounter, SkillMatcher, SkillRegistry,
};
use crate::utils::http::PageFetcher;

/// Summary of a collection run.
#[derive(Debug)]
pub struct CollectOutcome {
    pub postings: Vec<PostingRecord>,
    pub counter: SkillCounter,
    pub page_total: usize,
    pub page_failures: usize,
    pub detail_total: usize,
    pub detail_failures: usize,
    /// Postings kept without skill matching because their description was missing
    pub bodies_missing: usize,
}

impl CollectOutcome {
    fn new(counter: SkillCounter) -> Self {
        Self {
            postings: Vec::new(),
            counter,
            page_total: 0,
            page_failures: 0,
            detail_total: 0,
            detail_failures: 0,
            bodies_missing: 0,
        }
    }
}

/// Walk the feed and collect every reachable posting, one request at a time.
///
/// Failed pages and failed detail fetches are logged and skipped. Duplicate
/// identifiers across pages are fetched again.
pub async fn collect(
    config: &Config,
    fetcher: &dyn PageFetcher,
    registry: &SkillRegistry,
    query: &SearchQuery,
    total_wanted: usize,
) -> Result<CollectOutcome> {
    let paginator = ListingPaginator::new(fetcher, config)?;
    let extractor = DetailExtractor::new(fetcher, config)?;
    let matcher = SkillMatcher::new(registry);
    let mut limiter = RateLimiter::from_config(&config.crawler);
    let mut outcome = CollectOutcome::new(registry.counter());

    let pages = paginator.pages(query, total_wanted);
    pin_mut!(pages);

    while let Some(page) = pages.next().await {
        outcome.page_total += 1;
        let ids = match page.result {
            Ok(ids) => {
                log::info!("Page at offset {}: {} postings", page.offset, ids.len());
                ids
            }
            Err(error) => {
                outcome.page_failures += 1;
                log::warn!(
                    "Failed to fetch listing page at offset {}: {}",
                    page.offset,
                    error
                );
                continue;
            }
        };

        for id in ids {
            outcome.detail_total += 1;
            limiter.wait().await;

            let extracted = match extractor.fetch_detail(&id).await {
                Ok(extracted) => extracted,
                Err(error) => {
                    outcome.detail_failures += 1;
                    match error.status() {
                        Some(status) => log::warn!(
                            "Failed to retrieve job posting {}: Status code {}",
                            id,
                            status
                        ),
                        None => log::warn!("Failed to retrieve job posting {}: {}", id, error),
                    }
                    continue;
                }
            };

            match extracted.body.as_deref() {
                Some(body) => {
                    let matched = matcher.apply(
                        body,
                        extracted.record.company_name.as_deref(),
                        &mut outcome.counter,
                    );
                    log::debug!("Posting {} matched {} skills", id, matched);
                }
                None => {
                    outcome.bodies_missing += 1;
                    log::debug!("Posting {} has no description, skipping skill match", id);
                }
            }
            outcome.postings.push(extracted.record);
        }
    }

    Ok(outcome)
}
