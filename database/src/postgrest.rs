use crate::{ListingStore, JOBS_TABLE};
use async_trait::async_trait;
use jobscout_core::{CoreError, ScoredListing, StorageError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Inserts rows through a Supabase project's PostgREST endpoint.
#[derive(Debug)]
pub struct PostgrestStore {
    http_client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
}

impl PostgrestStore {
    pub fn new(base_url: String, api_key: String) -> Result<Self, CoreError> {
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
            table: JOBS_TABLE.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}

#[async_trait]
impl ListingStore for PostgrestStore {
    async fn insert_listings(&self, listings: &[ScoredListing]) -> Result<usize, StorageError> {
        let url = self.table_url();
        debug!("Inserting {} rows into {}", listings.len(), url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(listings)
            .send()
            .await
            .map_err(|e| StorageError::Network {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<PostgrestErrorBody>(&body) {
                Ok(PostgrestErrorBody {
                    message: Some(message),
                    code,
                    details,
                }) => {
                    error!(
                        "PostgREST rejected insert: code={:?} details={:?}",
                        code, details
                    );
                    message
                }
                _ => body,
            };
            return Err(StorageError::Rejected {
                status_code: status.as_u16(),
                message,
            });
        }

        let inserted: Vec<serde_json::Value> =
            response.json().await.map_err(|e| StorageError::InvalidResponse {
                details: e.to_string(),
            })?;

        info!("PostgREST accepted {} rows into {}", inserted.len(), self.table);
        Ok(inserted.len())
    }
}
