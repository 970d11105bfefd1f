use crate::rate_limiter::{RateLimitConfig, RateLimiter};
use crate::PageSource;
use async_trait::async_trait;
use jobscout_core::{AppConfig, CoreError, GatewayError, SearchQuery};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

const LINKEDIN_JOBS_SEARCH: &str = "https://www.linkedin.com/jobs/search/";
const SEARCH_LOCATION: &str = "India";
const GATEWAY_COUNTRY_CODE: &str = "in";

// Rendered pages routinely take longer than a plain fetch.
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(70);

// Error bodies are kept short in logs.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the ScraperAPI rendering gateway.
#[derive(Debug)]
pub struct ScraperApiClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl ScraperApiClient {
    pub fn new(
        api_url: String,
        api_key: String,
        rate_config: RateLimitConfig,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder().timeout(GATEWAY_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_url,
            api_key,
            rate_limiter: RateLimiter::new(rate_config),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Self::new(
            config.scraper_api_url.clone(),
            config.scraper_api_key.clone(),
            RateLimitConfig::scraper_api(),
        )
    }

    /// LinkedIn search page the gateway is asked to render for `query`.
    pub fn target_url(query: &SearchQuery) -> Result<Url, GatewayError> {
        Url::parse_with_params(
            LINKEDIN_JOBS_SEARCH,
            &[("keywords", query.as_str()), ("location", SEARCH_LOCATION)],
        )
        .map_err(|_| GatewayError::InvalidTargetUrl {
            url: query.to_string(),
        })
    }

    async fn request_page(&self, target: &Url) -> Result<String, GatewayError> {
        let params = [
            ("api_key", self.api_key.as_str()),
            ("url", target.as_str()),
            ("render", "true"),
            ("country_code", GATEWAY_COUNTRY_CODE),
        ];

        debug!("Requesting rendered page for {}", target);
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("Network error calling gateway for {}: {}", target, e);
                if e.is_timeout() {
                    GatewayError::RequestTimeout
                } else {
                    GatewayError::Network {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gateway returned {} for {}", status, target);
            return Err(GatewayError::Status {
                status_code: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let html = response.text().await.map_err(|e| GatewayError::Network {
            reason: format!("failed to read gateway response: {}", e),
        })?;

        info!("Received {} bytes of HTML for {}", html.len(), target);
        Ok(html)
    }

    pub fn delay_after_request(&self) -> Duration {
        self.rate_limiter.delay_after_request()
    }
}

#[async_trait]
impl PageSource for ScraperApiClient {
    async fn fetch_raw_page(&self, query: &SearchQuery) -> Result<String, GatewayError> {
        let target = Self::target_url(query)?;
        let result = self.request_page(&target).await;
        self.rate_limiter.pause_after_request().await;
        result
    }
}
