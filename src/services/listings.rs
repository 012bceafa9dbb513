// src/services/listings.rs

//! Listing feed pagination.
//!
//! The feed is walked at offsets `0, 25, 50, ...` until the offset reaches the
//! requested total. Termination is by count, not by feed exhaustion: a feed
//! with fewer postings than requested answers the remaining offsets with
//! empty pages unless `search.stop_on_empty_page` is set.

use futures::stream::{self, Stream};
use scraper::{Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{Config, PostingId, SearchConfig, SearchQuery, parse_selector};
use crate::utils::http::PageFetcher;

/// Postings per page of the upstream feed.
pub const PAGE_SIZE: usize = 25;

/// Offset into the listing feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    offset: usize,
    total_wanted: usize,
    exhausted: bool,
}

impl PaginationCursor {
    pub fn new(total_wanted: usize) -> Self {
        Self {
            offset: 0,
            total_wanted,
            exhausted: false,
        }
    }

    /// Offset of the next page to request, or `None` once terminal.
    pub fn next_offset(&mut self) -> Option<usize> {
        if self.exhausted || self.offset >= self.total_wanted {
            return None;
        }
        let offset = self.offset;
        self.offset += PAGE_SIZE;
        Some(offset)
    }

    /// Stop before the next page regardless of the remaining count.
    pub fn exhaust(&mut self) {
        self.exhausted = true;
    }
}

/// Outcome of one listing request.
#[derive(Debug)]
pub struct ListingPage {
    pub offset: usize,
    /// Identifiers in feed order, or the reason the page yielded none
    pub result: Result<Vec<PostingId>>,
}

impl ListingPage {
    /// Identifiers of the page; a failed page contributes none.
    pub fn into_ids(self) -> Vec<PostingId> {
        self.result.unwrap_or_default()
    }
}

/// Walks the search feed and pulls posting identifiers out of each page.
pub struct ListingPaginator<'a> {
    fetcher: &'a dyn PageFetcher,
    search: &'a SearchConfig,
    item_sel: Selector,
    card_sel: Selector,
    id_attr: &'a str,
}

impl<'a> ListingPaginator<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: &'a Config) -> Result<Self> {
        Ok(Self {
            fetcher,
            search: &config.search,
            item_sel: parse_selector(&config.selectors.listing_item)?,
            card_sel: parse_selector(&config.selectors.listing_card)?,
            id_attr: &config.selectors.listing_id_attr,
        })
    }

    /// Lazily request pages in order until `total_wanted` is covered.
    ///
    /// Failed pages are yielded like any other so the caller can log them;
    /// the walk continues at the next offset.
    pub fn pages<'q>(
        &'q self,
        query: &'q SearchQuery,
        total_wanted: usize,
    ) -> impl Stream<Item = ListingPage> + 'q {
        let stop_on_empty = self.search.stop_on_empty_page;
        stream::unfold(
            PaginationCursor::new(total_wanted),
            move |mut cursor| async move {
                let offset = cursor.next_offset()?;
                let result = self.fetch_page(query, offset).await;
                if stop_on_empty && matches!(&result, Ok(ids) if ids.is_empty()) {
                    cursor.exhaust();
                }
                Some((ListingPage { offset, result }, cursor))
            },
        )
    }

    /// Fetch a single page and extract its identifiers.
    pub async fn fetch_page(&self, query: &SearchQuery, offset: usize) -> Result<Vec<PostingId>> {
        let url = self.listing_url(query, offset)?;
        let body = self
            .fetcher
            .fetch(&url)
            .await?
            .into_success(format!("listing page at offset {offset}"))?;
        Ok(self.parse_ids(&body))
    }

    /// Build the feed URL for `offset`.
    pub fn listing_url(&self, query: &SearchQuery, offset: usize) -> Result<String> {
        let params = [
            ("keywords", query.title.clone()),
            ("location", query.location.clone()),
            ("distance", self.search.distance.to_string()),
            ("f_TPR", self.search.posted_within.clone()),
            ("f_WT", self.search.remote_filter.clone()),
            ("start", offset.to_string()),
        ];
        Ok(Url::parse_with_params(&self.search.listing_url, &params)?.to_string())
    }

    /// Extract identifiers from a listing fragment.
    ///
    /// Items without a job card or with a malformed URN are skipped; the feed
    /// mixes other elements in with the postings.
    pub fn parse_ids(&self, html: &str) -> Vec<PostingId> {
        let fragment = Html::parse_fragment(html);
        fragment
            .select(&self.item_sel)
            .filter_map(|item| item.select(&self.card_sel).next())
            .filter_map(|card| card.value().attr(self.id_attr))
            .filter_map(id_from_urn)
            .collect()
    }
}

/// `urn:li:jobPosting:3812345678` → `3812345678`
fn id_from_urn(urn: &str) -> Option<PostingId> {
    urn.split(':')
        .nth(3)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PostingId::new)
}
