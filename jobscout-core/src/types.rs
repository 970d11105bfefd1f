use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed tag written to `source` for every listing scraped from LinkedIn.
pub const LINKEDIN_SOURCE: &str = "linkedin";

/// Maximum number of characters kept from a card's visible text.
pub const EXCERPT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One job posting candidate as parsed from a search-results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub link: String,
    #[serde(rename = "description")]
    pub excerpt: String,
    pub location: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl JobListing {
    /// Returns `None` unless title, company and link are all non-empty after trimming.
    pub fn new(
        title: &str,
        company: &str,
        link: String,
        excerpt: &str,
        location: String,
        created_at: DateTime<Utc>,
    ) -> Option<Self> {
        let title = title.trim();
        let company = company.trim();
        if title.is_empty() || company.is_empty() || link.trim().is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            company: company.to_string(),
            link,
            excerpt: truncate_chars(excerpt, EXCERPT_MAX_CHARS),
            location,
            source: LINKEDIN_SOURCE.to_string(),
            created_at,
        })
    }
}

/// A listing together with its fit score; this is the persisted row shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: JobListing,
    pub fit_score: u8,
}

impl ScoredListing {
    pub fn new(listing: JobListing, fit_score: u8) -> Self {
        Self { listing, fit_score }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
