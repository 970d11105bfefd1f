//! In-memory stand-ins for the gateway and the storage table.

use async_trait::async_trait;
use database::ListingStore;
use jobscout_core::{
    AppConfig, GatewayError, RunMode, ScoredListing, SearchQuery, StorageConfig, StorageError,
};
use listing_source::{CardParser, PageSource};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

pub fn test_config(roles: &[&str]) -> AppConfig {
    AppConfig {
        scraper_api_key: "test-key".to_string(),
        scraper_api_url: "http://localhost:1".to_string(),
        storage: StorageConfig::Sqlite {
            url: "sqlite::memory:".to_string(),
        },
        target_roles: roles.iter().map(|r| r.to_string()).collect(),
        target_locations: vec!["remote".to_string()],
        min_fit_score: 75,
        run_mode: RunMode::Once,
        schedule_cron: "0 0 9 * * *".to_string(),
        schedule_timezone: "Asia/Kolkata".to_string(),
    }
}

pub fn linkedin_parser(config: &AppConfig) -> Arc<CardParser> {
    Arc::new(CardParser::linkedin(config.primary_location()).unwrap())
}

/// A results page with one LinkedIn card per `(title, href)`.
pub fn page(cards: &[(&str, &str)]) -> String {
    let cards: String = cards
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<div class="base-card"><a href="{}"></a>
                   <h3 class="base-search-card__title">{}</h3>
                   <h4 class="base-search-card__subtitle">Acme Hiring</h4></div>"#,
                href, title
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

pub fn gateway_failure() -> GatewayError {
    GatewayError::Status {
        status_code: 500,
        message: "upstream render failed".to_string(),
    }
}

/// Answers queries from a script; an exhausted script yields empty pages.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_raw_page(&self, query: &SearchQuery) -> Result<String, GatewayError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page(&[])))
    }
}

/// Holds every fetch until a permit is added to `release`, so a run can be
/// observed in flight.
pub struct GatedSource {
    pub entered: Notify,
    pub release: Semaphore,
}

impl GatedSource {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }
}

#[async_trait]
impl PageSource for GatedSource {
    async fn fetch_raw_page(&self, _query: &SearchQuery) -> Result<String, GatewayError> {
        self.entered.notify_one();
        let _permit = self.release.acquire().await;
        Ok(page(&[]))
    }
}

pub struct RecordingStore {
    fail: bool,
    batches: Mutex<Vec<Vec<ScoredListing>>>,
}

impl RecordingStore {
    pub fn accepting() -> Self {
        Self {
            fail: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batches(&self) -> Vec<Vec<ScoredListing>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingStore for RecordingStore {
    async fn insert_listings(&self, listings: &[ScoredListing]) -> Result<usize, StorageError> {
        self.batches.lock().unwrap().push(listings.to_vec());
        if self.fail {
            return Err(StorageError::Rejected {
                status_code: 401,
                message: "permission denied for table jobs".to_string(),
            });
        }
        Ok(listings.len())
    }
}
