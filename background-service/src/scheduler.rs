use crate::pipeline::{Pipeline, RunReport};
use chrono_tz::Tz;
use jobscout_core::{ConfigError, CoreError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{info, warn};

/// Allows at most one pipeline run at a time across all triggers.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    lock: Arc<Mutex<()>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// Runs the pipeline unless another run holds the guard, in which case
    /// this trigger is dropped and `None` is returned.
    pub async fn run_exclusive(&self, pipeline: &Pipeline, trigger: &str) -> Option<RunReport> {
        let _running = match self.lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Skipping {} run: previous run still in progress", trigger);
                return None;
            }
        };

        info!("Starting {} run", trigger);
        Some(pipeline.run().await)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySchedule {
    pub cron: String,
    pub timezone: Tz,
}

impl DailySchedule {
    pub fn new(cron: &str, timezone: &str) -> Result<Self, CoreError> {
        let timezone = timezone.parse::<Tz>().map_err(|_| ConfigError::InvalidValue {
            field: "SCHEDULE_TZ".to_string(),
            value: timezone.to_string(),
        })?;

        Ok(Self {
            cron: cron.to_string(),
            timezone,
        })
    }

    /// Builds a started scheduler that fires the guarded pipeline on this schedule.
    pub async fn start(
        &self,
        pipeline: Arc<Pipeline>,
        guard: RunGuard,
    ) -> Result<JobScheduler, CoreError> {
        let scheduler = JobScheduler::new().await.map_err(scheduler_error)?;

        let job = Job::new_async_tz(self.cron.as_str(), self.timezone, move |_uuid, _lock| {
            let pipeline = pipeline.clone();
            let guard = guard.clone();
            Box::pin(async move {
                info!("Daily job search starting...");
                guard.run_exclusive(&pipeline, "scheduled").await;
            })
        })
        .map_err(scheduler_error)?;

        scheduler.add(job).await.map_err(scheduler_error)?;
        scheduler.start().await.map_err(scheduler_error)?;

        info!("Scheduled job search '{}' ({})", self.cron, self.timezone);
        Ok(scheduler)
    }
}

fn scheduler_error(e: JobSchedulerError) -> CoreError {
    CoreError::Scheduler {
        message: format!("{:?}", e),
    }
}
