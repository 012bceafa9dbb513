//! Service layer for the collector.
//!
//! This module contains the business logic for:
//! - Skill vocabulary and counters (`SkillRegistry`, `SkillCounter`)
//! - Listing feed pagination (`ListingPaginator`)
//! - Detail page extraction (`DetailExtractor`)
//! - Skill keyword matching (`SkillMatcher`)
//! - Request pacing (`RateLimiter`)

mod details;
mod listings;
mod matcher;
mod rate_limit;
mod registry;

pub use details::{DetailExtractor, ExtractedPosting};
pub use listings::{ListingPage, ListingPaginator, PAGE_SIZE, PaginationCursor};
pub use matcher::SkillMatcher;
pub use rate_limit::RateLimiter;
pub use registry::{SkillCounter, SkillRegistry, SkillTally};
