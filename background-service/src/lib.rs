pub mod pipeline;
pub mod scheduler;

#[cfg(test)]
mod test_support;

pub use pipeline::{PersistOutcome, Pipeline, PipelineStage, RunReport};
pub use scheduler::{DailySchedule, RunGuard};

use jobscout_core::{AppConfig, CoreError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::JobScheduler;

/// Owns the pipeline and both of its triggers: an immediate run and the
/// daily schedule. Every trigger goes through the same [`RunGuard`].
pub struct BackgroundService {
    pipeline: Arc<Pipeline>,
    guard: RunGuard,
    schedule: DailySchedule,
    scheduler: Mutex<Option<JobScheduler>>,
}

impl BackgroundService {
    pub fn new(config: &AppConfig, pipeline: Pipeline) -> Result<Self, CoreError> {
        Ok(Self {
            pipeline: Arc::new(pipeline),
            guard: RunGuard::new(),
            schedule: DailySchedule::new(&config.schedule_cron, &config.schedule_timezone)?,
            scheduler: Mutex::new(None),
        })
    }

    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    /// Runs the pipeline now; `None` when a run is already in progress.
    pub async fn run_now(&self) -> Option<RunReport> {
        self.guard.run_exclusive(&self.pipeline, "startup").await
    }

    pub async fn start(&self) -> Result<(), CoreError> {
        let mut slot = self.scheduler.lock().await;
        if slot.is_some() {
            return Ok(());
        }

        let scheduler = self
            .schedule
            .start(self.pipeline.clone(), self.guard.clone())
            .await?;
        *slot = Some(scheduler);
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), CoreError> {
        if let Some(mut scheduler) = self.scheduler.lock().await.take() {
            scheduler
                .shutdown()
                .await
                .map_err(|e| CoreError::Scheduler {
                    message: format!("{:?}", e),
                })?;
            tracing::info!("Daily schedule stopped");
        }
        Ok(())
    }
}
