// src/services/details.rs

//! Posting detail extraction.
//!
//! Every field has its own extraction rule. A selector that no longer matches
//! blanks that one field and leaves the rest of the record intact.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{Config, PostingId, PostingRecord, SelectorConfig, parse_selector};
use crate::utils::http::PageFetcher;
use crate::utils::normalize_whitespace;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("static regex is valid"));

const APPLICANTS_SUFFIX: &str = " applicants";

/// A parsed detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPosting {
    pub record: PostingRecord,
    /// Description text used for skill matching; `None` when the block is missing
    pub body: Option<String>,
}

/// Compiled selectors for the detail document.
struct DetailSelectors {
    title: Selector,
    company: Selector,
    location: Selector,
    time_posted: Selector,
    applicants: Selector,
    body: Selector,
}

impl DetailSelectors {
    fn compile(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            title: parse_selector(&config.title)?,
            company: parse_selector(&config.company)?,
            location: parse_selector(&config.location)?,
            time_posted: parse_selector(&config.time_posted)?,
            applicants: parse_selector(&config.applicants)?,
            body: parse_selector(&config.body)?,
        })
    }
}

/// Fetches detail pages and turns them into [`PostingRecord`]s.
pub struct DetailExtractor<'a> {
    fetcher: &'a dyn PageFetcher,
    detail_url: &'a str,
    selectors: DetailSelectors,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: &'a Config) -> Result<Self> {
        Ok(Self {
            fetcher,
            detail_url: config.search.detail_url.trim_end_matches('/'),
            selectors: DetailSelectors::compile(&config.selectors)?,
        })
    }

    pub fn detail_url(&self, id: &PostingId) -> String {
        format!("{}/{}", self.detail_url, id)
    }

    /// Fetch and parse one posting.
    ///
    /// Errors only when the page itself could not be retrieved; missing
    /// fields never fail the call.
    pub async fn fetch_detail(&self, id: &PostingId) -> Result<ExtractedPosting> {
        let html = self
            .fetcher
            .fetch(&self.detail_url(id))
            .await?
            .into_success(format!("posting {id}"))?;
        Ok(self.parse(id, &html))
    }

    /// Extract every field from a detail document.
    pub fn parse(&self, id: &PostingId, html: &str) -> ExtractedPosting {
        let document = Html::parse_document(html);
        let sel = &self.selectors;

        let record = PostingRecord {
            posting_id: id.clone(),
            job_title: first_text(&document, &sel.title),
            company_name: first_text(&document, &sel.company),
            location: first_text(&document, &sel.location).and_then(|raw| parse_location(&raw)),
            time_posted: first_text(&document, &sel.time_posted),
            num_applicants: first_text(&document, &sel.applicants)
                .and_then(|raw| parse_applicants(&raw))
                .unwrap_or(0),
        };

        ExtractedPosting {
            record,
            body: first_text(&document, &sel.body),
        }
    }
}

/// Whitespace-normalized text of the first match; empty text counts as absent.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = normalize_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Keep the segment before the first comma: `Berlin, Germany` → `Berlin`.
///
/// A blank first segment (`, Germany`) counts as no location.
fn parse_location(raw: &str) -> Option<String> {
    let city = raw.split(',').next()?.trim();
    (!city.is_empty()).then(|| city.to_string())
}

/// `57 applicants` → 57. Phrasings such as `Over 200 applicants` or
/// `Be among the first 25 applicants` yield their last number.
fn parse_applicants(raw: &str) -> Option<u32> {
    let count = raw.trim().strip_suffix(APPLICANTS_SUFFIX).unwrap_or(raw).trim();
    if let Ok(n) = count.parse() {
        return Some(n);
    }
    DIGITS
        .find_iter(count)
        .last()
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::FetchedPage;
    use crate::utils::http::testing::StubFetcher;

    const TITLE: &str = r#"<h2 class="top-card-layout__title font-sans text-lg papabear:text-xl font-bold leading-open text-color-text mb-0 topcard__title">
        Senior Rust Engineer
    </h2>"#;
    const COMPANY: &str = r#"<a class="topcard__org-name-link topcard__flavor--black-link" href="/company/acme">
        Acme Corp
    </a>"#;
    const LOCATION: &str =
        r#"<span class="topcard__flavor topcard__flavor--bullet"> Berlin, Berlin, Germany </span>"#;
    const POSTED: &str =
        r#"<span class="posted-time-ago__text topcard__flavor--metadata">2 weeks ago</span>"#;
    const APPLICANTS: &str = r#"<span class="num-applicants__caption topcard__flavor--metadata topcard__flavor--bullet">
        57 applicants
    </span>"#;
    const BODY: &str = r#"<div class="show-more-less-html__markup show-more-less-html__markup--clamp-after-5 relative overflow-hidden">
        <p>We build services in <strong>Rust</strong> and Python.</p>
    </div>"#;

    fn document(parts: &[&str]) -> String {
        format!("<html><body>{}</body></html>", parts.concat())
    }

    fn with_extractor<T>(f: impl FnOnce(&DetailExtractor<'_>) -> T) -> T {
        let config = Config::default();
        let fetcher = StubFetcher::default();
        let extractor = DetailExtractor::new(&fetcher, &config).unwrap();
        f(&extractor)
    }

    #[test]
    fn parses_full_document() {
        let html = document(&[TITLE, COMPANY, LOCATION, POSTED, APPLICANTS, BODY]);
        let parsed = with_extractor(|e| e.parse(&PostingId::new("1"), &html));

        assert_eq!(parsed.record.job_title.as_deref(), Some("Senior Rust Engineer"));
        assert_eq!(parsed.record.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(parsed.record.location.as_deref(), Some("Berlin"));
        assert_eq!(parsed.record.time_posted.as_deref(), Some("2 weeks ago"));
        assert_eq!(parsed.record.num_applicants, 57);
        assert_eq!(
            parsed.body.as_deref(),
            Some("We build services in Rust and Python.")
        );
    }

    #[test]
    fn missing_applicants_defaults_to_zero() {
        let html = document(&[TITLE, COMPANY, LOCATION, POSTED, BODY]);
        let parsed = with_extractor(|e| e.parse(&PostingId::new("1"), &html));
        assert_eq!(parsed.record.num_applicants, 0);
        assert!(parsed.record.job_title.is_some());
    }

    #[test]
    fn missing_body_keeps_other_fields() {
        let html = document(&[TITLE, COMPANY, LOCATION, POSTED, APPLICANTS]);
        let parsed = with_extractor(|e| e.parse(&PostingId::new("1"), &html));
        assert!(parsed.body.is_none());
        assert_eq!(parsed.record.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(parsed.record.location.as_deref(), Some("Berlin"));
        assert_eq!(parsed.record.num_applicants, 57);
    }

    #[test]
    fn each_field_fails_alone() {
        let html = document(&[COMPANY, BODY]);
        let parsed = with_extractor(|e| e.parse(&PostingId::new("9"), &html));
        assert_eq!(parsed.record.job_title, None);
        assert_eq!(parsed.record.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(parsed.record.location, None);
        assert_eq!(parsed.record.time_posted, None);
        assert!(parsed.body.is_some());
    }

    #[test]
    fn parse_is_idempotent() {
        let html = document(&[TITLE, COMPANY, LOCATION, POSTED, APPLICANTS, BODY]);
        let (first, second) = with_extractor(|e| {
            let id = PostingId::new("1");
            (e.parse(&id, &html), e.parse(&id, &html))
        });
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("Austin, TX"), Some("Austin".to_string()));
        assert_eq!(parse_location("Remote"), Some("Remote".to_string()));
        assert_eq!(parse_location(", Germany"), None);
    }

    #[test]
    fn test_parse_applicants() {
        assert_eq!(parse_applicants("57 applicants"), Some(57));
        assert_eq!(parse_applicants("Over 200 applicants"), Some(200));
        assert_eq!(parse_applicants("Be among the first 25 applicants"), Some(25));
        assert_eq!(parse_applicants("1,024 applicants"), Some(1024));
        assert_eq!(parse_applicants("No applicants yet"), None);
    }

    #[tokio::test]
    async fn fetch_detail_rejects_error_status() {
        let config = Config::default();
        let fetcher = StubFetcher::default().route(
            "jobPosting/404",
            FetchedPage {
                status: 404,
                body: String::new(),
            },
        );
        let extractor = DetailExtractor::new(&fetcher, &config).unwrap();

        let err = extractor
            .fetch_detail(&PostingId::new("404"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn fetch_detail_requests_posting_url() {
        let config = Config::default();
        let html = document(&[TITLE, BODY]);
        let fetcher = StubFetcher::default().route("jobPosting/77", FetchedPage::ok(html));
        let extractor = DetailExtractor::new(&fetcher, &config).unwrap();

        let parsed = extractor.fetch_detail(&PostingId::new("77")).await.unwrap();
        assert_eq!(parsed.record.posting_id, PostingId::new("77"));
        assert_eq!(
            fetcher.requested(),
            vec!["https://www.linkedin.com/jobs-guest/jobs/api/jobPosting/77".to_string()]
        );
    }
}
