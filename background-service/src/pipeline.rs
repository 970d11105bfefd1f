//! One scrape → score → filter → persist pass.
//!
//! ```text
//! Idle → Querying (once per query) → Scoring → Filtering → Persisting → Done
//! ```
//!
//! Nothing is kept between runs. A failed query contributes no listings and a
//! failed insert is reported, but neither stops the run.

use chrono::Utc;
use database::ListingStore;
use jobscout_core::{
    build_search_queries, retain_qualified, AppConfig, CoreError, ErrorReporter, FitScorer,
    JobListing, SearchQuery,
};
use listing_source::{ListingParser, PageSource};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Querying,
    Scoring,
    Filtering,
    Persisting,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Querying => "querying",
            PipelineStage::Scoring => "scoring",
            PipelineStage::Filtering => "filtering",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// No listing reached the threshold; the store was not called.
    Skipped,
    Saved(usize),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub queries_attempted: usize,
    pub fetch_failures: usize,
    pub listings_found: usize,
    pub qualified: usize,
    pub persist: PersistOutcome,
}

pub struct Pipeline {
    target_roles: Vec<String>,
    target_locations: Vec<String>,
    min_fit_score: u8,
    scorer: FitScorer,
    source: Arc<dyn PageSource>,
    parser: Arc<dyn ListingParser>,
    store: Arc<dyn ListingStore>,
    reporter: ErrorReporter,
}

impl Pipeline {
    pub fn new(
        config: &AppConfig,
        source: Arc<dyn PageSource>,
        parser: Arc<dyn ListingParser>,
        store: Arc<dyn ListingStore>,
    ) -> Self {
        Self {
            target_roles: config.target_roles.clone(),
            target_locations: config.target_locations.clone(),
            min_fit_score: config.min_fit_score,
            scorer: FitScorer::new(&config.target_locations),
            source,
            parser,
            store,
            reporter: ErrorReporter::new(),
        }
    }

    pub async fn run(&self) -> RunReport {
        let mut stage = PipelineStage::Idle;
        info!("Scraping jobs...");

        advance(&mut stage, PipelineStage::Querying);
        let queries = build_search_queries(&self.target_roles, &self.target_locations);
        let mut fetch_failures = 0;
        let mut all_jobs: Vec<JobListing> = Vec::new();

        for query in &queries {
            match self.collect_query(query).await {
                Ok(jobs) => all_jobs.extend(jobs),
                Err(e) => {
                    fetch_failures += 1;
                    info!("Error scraping {}", query);
                    self.reporter.report_warning(&e);
                }
            }
        }
        let listings_found = all_jobs.len();
        info!("Found {} jobs", listings_found);

        advance(&mut stage, PipelineStage::Scoring);
        let scored = self.scorer.score_all(all_jobs);

        advance(&mut stage, PipelineStage::Filtering);
        let qualified = retain_qualified(scored, self.min_fit_score);
        info!(
            "{} high-fit jobs (score >= {})",
            qualified.len(),
            self.min_fit_score
        );

        advance(&mut stage, PipelineStage::Persisting);
        let persist = if qualified.is_empty() {
            PersistOutcome::Skipped
        } else {
            match self.store.insert_listings(&qualified).await {
                Ok(saved) => {
                    info!("Saved {} jobs to database", saved);
                    PersistOutcome::Saved(saved)
                }
                Err(e) => {
                    self.reporter.report_error(&CoreError::Storage(e));
                    PersistOutcome::Failed
                }
            }
        };

        advance(&mut stage, PipelineStage::Done);
        info!("Job scraping complete!");

        RunReport {
            queries_attempted: queries.len(),
            fetch_failures,
            listings_found,
            qualified: qualified.len(),
            persist,
        }
    }

    async fn collect_query(&self, query: &SearchQuery) -> Result<Vec<JobListing>, CoreError> {
        info!("Searching: {}", query);
        let html = self.source.fetch_raw_page(query).await?;
        let jobs = self.parser.parse_listings(&html, Utc::now());
        debug!("{} listings kept for {}", jobs.len(), query);
        Ok(jobs)
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!("Pipeline stage {} -> {}", stage, next);
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_failed_query_does_not_stop_later_queries() {
        let config = test_config(&["localization project manager", "transcreation lead"]);
        let source = Arc::new(ScriptedSource::new(vec![
            Err(gateway_failure()),
            Ok(page(&[("Localization Project Manager", "/jobs/view/1")])),
            Err(gateway_failure()),
            Ok(page(&[("Transcreation PM", "/jobs/view/2")])),
        ]));
        let store = Arc::new(RecordingStore::accepting());

        let pipeline = Pipeline::new(&config, source.clone(), linkedin_parser(&config), store.clone());
        let report = pipeline.run().await;

        assert_eq!(source.calls(), 4);
        assert_eq!(report.queries_attempted, 4);
        assert_eq!(report.fetch_failures, 2);
        assert_eq!(report.listings_found, 2);
        assert_eq!(report.qualified, 2);
        assert_eq!(report.persist, PersistOutcome::Saved(2));
        assert_eq!(store.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_queries_are_sent_in_builder_order() {
        let config = test_config(&["a", "b"]);
        let source = Arc::new(ScriptedSource::new(vec![]));
        let store = Arc::new(RecordingStore::accepting());

        Pipeline::new(&config, source.clone(), linkedin_parser(&config), store)
            .run()
            .await;

        assert_eq!(
            source.queries(),
            vec![
                "\"a\" jobs remote",
                "\"b\" jobs remote",
                "a remote",
                "b remote"
            ]
        );
    }

    #[tokio::test]
    async fn test_no_qualified_listings_skips_store() {
        let config = test_config(&["barista"]);
        let source = Arc::new(ScriptedSource::new(vec![Ok(page(&[
            ("Barista", "/jobs/view/1"),
            ("Line Cook", "/jobs/view/2"),
        ]))]));
        let store = Arc::new(RecordingStore::accepting());

        // Every listing carries the first target location, so both score 70.
        let pipeline = Pipeline::new(&config, source, linkedin_parser(&config), store.clone());
        let report = pipeline.run().await;

        assert_eq!(report.listings_found, 2);
        assert_eq!(report.qualified, 0);
        assert_eq!(report.persist, PersistOutcome::Skipped);
        assert!(store.batches().is_empty());
    }

    #[tokio::test]
    async fn test_threshold_filters_before_persisting() {
        let config = test_config(&["pm"]);
        let source = Arc::new(ScriptedSource::new(vec![Ok(page(&[
            ("Barista", "/jobs/view/1"),
            ("Localization Project Manager", "/jobs/view/2"),
        ]))]));
        let store = Arc::new(RecordingStore::accepting());

        let report = Pipeline::new(&config, source, linkedin_parser(&config), store.clone())
            .run()
            .await;

        // Barista: 50 base + 20 location = 70, below 75.
        assert_eq!(report.qualified, 1);
        let batches = store.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[0][0].listing.title, "Localization Project Manager");
        assert_eq!(batches[0][0].fit_score, 100);
    }

    #[tokio::test]
    async fn test_store_failure_still_completes_run() {
        let config = test_config(&["pm"]);
        let source = Arc::new(ScriptedSource::new(vec![Ok(page(&[(
            "Localization Project Manager",
            "/jobs/view/2",
        )]))]));
        let store = Arc::new(RecordingStore::failing());

        let report = Pipeline::new(&config, source.clone(), linkedin_parser(&config), store.clone())
            .run()
            .await;

        assert_eq!(report.persist, PersistOutcome::Failed);
        assert_eq!(report.qualified, 1);
        assert_eq!(store.batches().len(), 1);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::Idle.to_string(), "idle");
        assert_eq!(PipelineStage::Persisting.to_string(), "persisting");
    }
}
