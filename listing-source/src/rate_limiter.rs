use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Pause taken after every gateway request, successful or not.
    pub delay_after_request: Duration,
}

impl RateLimitConfig {
    pub fn scraper_api() -> Self {
        Self {
            delay_after_request: Duration::from_secs(2),
        }
    }

    pub fn with_delay(delay_after_request: Duration) -> Self {
        Self {
            delay_after_request,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::scraper_api()
    }
}

/// Fixed-delay pacing for a strictly sequential caller. The delay is not
/// adaptive: every request is followed by the same pause.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }

    pub fn delay_after_request(&self) -> Duration {
        self.config.delay_after_request
    }

    pub async fn pause_after_request(&self) {
        let delay = self.config.delay_after_request;
        if !delay.is_zero() {
            tracing::debug!("Pausing {:?} before the next gateway request", delay);
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_scraper_api_defaults_to_two_seconds() {
        assert_eq!(
            RateLimitConfig::scraper_api().delay_after_request,
            Duration::from_secs(2)
        );
        assert_eq!(
            RateLimiter::new(RateLimitConfig::default()).delay_after_request(),
            Duration::from_secs(2)
        );
    }

    #[tokio::test]
    async fn test_pause_waits_the_configured_delay() {
        let limiter = RateLimiter::new(RateLimitConfig::with_delay(Duration::from_millis(30)));

        let start = Instant::now();
        for _ in 0..2 {
            limiter.pause_after_request().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
