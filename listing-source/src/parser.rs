//! Extraction of job cards from a rendered search-results page.
//!
//! The page layout is described by a [`CardLayout`] so that a change on the
//! scraped site only touches selector strings, never scoring or storage.

use crate::ListingParser;
use chrono::{DateTime, Utc};
use jobscout_core::{CoreError, JobListing};
use scraper::{ElementRef, Html, Selector};

pub const LINKEDIN_HOST: &str = "https://linkedin.com";
pub const MAX_LISTINGS_PER_QUERY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub card: String,
    pub title: String,
    pub company: String,
    pub link: String,
    pub link_attribute: String,
    /// Prepended verbatim to the link attribute.
    pub link_host: String,
}

impl CardLayout {
    pub fn linkedin() -> Self {
        Self {
            card: "div.base-card".to_string(),
            title: ".base-search-card__title".to_string(),
            company: ".base-search-card__subtitle".to_string(),
            link: "a".to_string(),
            link_attribute: "href".to_string(),
            link_host: LINKEDIN_HOST.to_string(),
        }
    }
}

impl Default for CardLayout {
    fn default() -> Self {
        Self::linkedin()
    }
}

#[derive(Debug)]
pub struct CardParser {
    card: Selector,
    title: Selector,
    company: Selector,
    link: Selector,
    link_attribute: String,
    link_host: String,
    location: String,
    max_listings: usize,
}

impl CardParser {
    /// `location` is stamped on every listing produced by this parser.
    pub fn new(layout: CardLayout, location: impl Into<String>) -> Result<Self, CoreError> {
        Ok(Self {
            card: parse_selector(&layout.card)?,
            title: parse_selector(&layout.title)?,
            company: parse_selector(&layout.company)?,
            link: parse_selector(&layout.link)?,
            link_attribute: layout.link_attribute,
            link_host: layout.link_host,
            location: location.into(),
            max_listings: MAX_LISTINGS_PER_QUERY,
        })
    }

    pub fn linkedin(location: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(CardLayout::linkedin(), location)
    }

    pub fn with_max_listings(mut self, max_listings: usize) -> Self {
        self.max_listings = max_listings;
        self
    }

    fn parse_card(&self, card: ElementRef<'_>, fetched_at: DateTime<Utc>) -> Option<JobListing> {
        let title = collect_text(card, &self.title);
        let company = collect_text(card, &self.company);
        let href = card
            .select(&self.link)
            .next()
            .and_then(|anchor| anchor.value().attr(&self.link_attribute))
            .map(str::trim)
            .filter(|href| !href.is_empty())?;

        let excerpt: String = card.text().collect();

        JobListing::new(
            &title,
            &company,
            format!("{}{}", self.link_host, href),
            &excerpt,
            self.location.clone(),
            fetched_at,
        )
    }
}

impl ListingParser for CardParser {
    fn parse_listings(&self, html: &str, fetched_at: DateTime<Utc>) -> Vec<JobListing> {
        let document = Html::parse_document(html);
        let listings: Vec<JobListing> = document
            .select(&self.card)
            .filter_map(|card| self.parse_card(card, fetched_at))
            .take(self.max_listings)
            .collect();

        tracing::debug!("Parsed {} listings from page", listings.len());
        listings
    }
}

fn parse_selector(selector: &str) -> Result<Selector, CoreError> {
    Selector::parse(selector).map_err(|e| CoreError::InvalidInput {
        message: format!("invalid CSS selector '{}': {:?}", selector, e),
    })
}

fn collect_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector).flat_map(|element| element.text()).collect()
}
