//! Search-page acquisition and listing extraction.
//!
//! [`PageSource`] hides how raw result pages are obtained and
//! [`ListingParser`] hides the page layout; the pipeline only sees these two
//! traits.

pub mod gateway;
pub mod parser;
pub mod rate_limiter;


pub use gateway::ScraperApiClient;
pub use parser::{CardLayout, CardParser, LINKEDIN_HOST, MAX_LISTINGS_PER_QUERY};
pub use rate_limiter::{RateLimitConfig, RateLimiter};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobscout_core::{GatewayError, JobListing, SearchQuery};

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the raw HTML of the search-results page for `query`.
    async fn fetch_raw_page(&self, query: &SearchQuery) -> Result<String, GatewayError>;
}

pub trait ListingParser: Send + Sync {
    fn parse_listings(&self, html: &str, fetched_at: DateTime<Utc>) -> Vec<JobListing>;
}
