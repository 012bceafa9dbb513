//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and pacing settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Search feed and detail endpoints
    #[serde(default)]
    pub search: SearchConfig,

    /// CSS markers of the listing and detail markup
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.min_delay_ms > self.crawler.max_delay_ms {
            return Err(AppError::validation(
                "crawler.min_delay_ms must not exceed crawler.max_delay_ms",
            ));
        }
        url::Url::parse(&self.search.listing_url)?;
        url::Url::parse(&self.search.detail_url)?;
        if self.selectors.listing_id_attr.trim().is_empty() {
            return Err(AppError::validation("selectors.listing_id_attr is empty"));
        }
        for selector in self.selectors.css_selectors() {
            parse_selector(selector)?;
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// HTTP client and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Lower bound of the pause between detail fetches
    #[serde(default = "defaults::min_delay")]
    pub min_delay_ms: u64,

    /// Upper bound of the pause between detail fetches
    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            min_delay_ms: defaults::min_delay(),
            max_delay_ms: defaults::max_delay(),
        }
    }
}

/// Search feed parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Paginated listing feed endpoint
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Detail endpoint; the posting id is appended as the last path segment
    #[serde(default = "defaults::detail_url")]
    pub detail_url: String,

    /// Search radius sent as `distance`
    #[serde(default = "defaults::distance")]
    pub distance: u32,

    /// Workplace filter sent as `f_WT` (`1` = on-site/remote as upstream defines it)
    #[serde(default = "defaults::remote_filter")]
    pub remote_filter: String,

    /// Posted-within filter sent as `f_TPR`; empty means any time
    #[serde(default)]
    pub posted_within: String,

    /// Stop paginating after a page that loaded fine but had no postings
    #[serde(default)]
    pub stop_on_empty_page: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            detail_url: defaults::detail_url(),
            distance: defaults::distance(),
            remote_filter: defaults::remote_filter(),
            posted_within: String::new(),
            stop_on_empty_page: false,
        }
    }
}

/// CSS markers for the listing fragment and the detail document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "defaults::listing_item")]
    pub listing_item: String,
    #[serde(default = "defaults::listing_card")]
    pub listing_card: String,
    /// Attribute holding the `urn:li:jobPosting:<id>` token
    #[serde(default = "defaults::listing_id_attr")]
    pub listing_id_attr: String,
    #[serde(default = "defaults::title")]
    pub title: String,
    #[serde(default = "defaults::company")]
    pub company: String,
    #[serde(default = "defaults::location")]
    pub location: String,
    #[serde(default = "defaults::time_posted")]
    pub time_posted: String,
    #[serde(default = "defaults::applicants")]
    pub applicants: String,
    #[serde(default = "defaults::body")]
    pub body: String,
}

impl SelectorConfig {
    fn css_selectors(&self) -> [&str; 8] {
        [
            self.listing_item.as_str(),
            self.listing_card.as_str(),
            self.title.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.time_posted.as_str(),
            self.applicants.as_str(),
            self.body.as_str(),
        ]
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_item: defaults::listing_item(),
            listing_card: defaults::listing_card(),
            listing_id_attr: defaults::listing_id_attr(),
            title: defaults::title(),
            company: defaults::company(),
            location: defaults::location(),
            time_posted: defaults::time_posted(),
            applicants: defaults::applicants(),
            body: defaults::body(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// CSV file with a `skills` column
    #[serde(default = "defaults::skills_file")]
    pub skills_file: PathBuf,

    /// Directory receiving the report tables
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            skills_file: defaults::skills_file(),
            output_dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobskills/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn min_delay() -> u64 {
        1_000
    }
    pub fn max_delay() -> u64 {
        3_000
    }

    // Search defaults
    pub fn listing_url() -> String {
        "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search".into()
    }
    pub fn detail_url() -> String {
        "https://www.linkedin.com/jobs-guest/jobs/api/jobPosting".into()
    }
    pub fn distance() -> u32 {
        25
    }
    pub fn remote_filter() -> String {
        "1".into()
    }

    // Selector defaults
    pub fn listing_item() -> String {
        "li".into()
    }
    pub fn listing_card() -> String {
        "div.base-card".into()
    }
    pub fn listing_id_attr() -> String {
        "data-entity-urn".into()
    }
    pub fn title() -> String {
        "h2.top-card-layout__title".into()
    }
    pub fn company() -> String {
        "a.topcard__org-name-link".into()
    }
    pub fn location() -> String {
        "span.topcard__flavor.topcard__flavor--bullet".into()
    }
    pub fn time_posted() -> String {
        "span.posted-time-ago__text".into()
    }
    pub fn applicants() -> String {
        "span.num-applicants__caption".into()
    }
    pub fn body() -> String {
        "div.show-more-less-html__markup".into()
    }

    // Path defaults
    pub fn skills_file() -> PathBuf {
        PathBuf::from("skills.csv")
    }
    pub fn output_dir() -> PathBuf {
        PathBuf::from("results")
    }
}
