//! Cron scheduler for the periodic notification jobs.
//!
//! Requires the `background-jobs` feature.
//!
//! # Usage
//!
//! ```rust,ignore
//! use notifications::jobs::{JobConfig, JobScheduler, NotificationJobs};
//!
//! let scheduler = JobScheduler::new(jobs, JobConfig::default()).await?;
//! scheduler.start().await?;
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler as TokioJobScheduler};
use tracing::{error, info};
use uuid::Uuid;

use super::{JobError, NotificationJobs};
use crate::config::JobsConfig;
use crate::mail::Mailer;

/// Configuration for scheduled jobs.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Cron expression for the expiration reminder scan (default: daily at 08:00 UTC)
    pub expiration_reminder_cron: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self::from(&JobsConfig::default())
    }
}

impl From<&JobsConfig> for JobConfig {
    fn from(config: &JobsConfig) -> Self {
        Self {
            expiration_reminder_cron: config.expiration_reminder_cron.clone(),
        }
    }
}

/// Runs the expiration reminder scan on a cron schedule.
pub struct JobScheduler {
    scheduler: TokioJobScheduler,
    jobs: Arc<NotificationJobs>,
    config: JobConfig,
    /// Registered expiration job; `Some` once started.
    reminder_job: Mutex<Option<Uuid>>,
}

impl JobScheduler {
    /// Create a new job scheduler.
    pub async fn new(jobs: NotificationJobs, config: JobConfig) -> Result<Self, JobError> {
        let scheduler = TokioJobScheduler::new()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        Ok(Self {
            scheduler,
            jobs: Arc::new(jobs),
            config,
            reminder_job: Mutex::new(None),
        })
    }

    /// Register the scheduled jobs and start ticking.
    ///
    /// A scheduler starts once. Later calls fail without registering
    /// another copy of the job.
    pub async fn start(&self) -> Result<(), JobError> {
        let mut reminder_job = self.reminder_job.lock().await;
        if reminder_job.is_some() {
            return Err(JobError::SchedulerError(
                "scheduler already started".to_string(),
            ));
        }

        info!(
            mailer = self.jobs.mailer.name(),
            "Starting notification job scheduler"
        );

        let job_id = self.add_expiration_reminder_job().await?;

        if let Err(e) = self.scheduler.start().await {
            if let Err(remove_err) = self.scheduler.remove(&job_id).await {
                error!("Failed to remove expiration reminder job: {}", remove_err);
            }
            return Err(JobError::SchedulerError(e.to_string()));
        }

        *reminder_job = Some(job_id);
        info!("Notification job scheduler started successfully");

        Ok(())
    }

    /// Stop the job scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobError> {
        info!("Shutting down notification job scheduler");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;
        Ok(())
    }

    /// Add the expiration reminder job.
    async fn add_expiration_reminder_job(&self) -> Result<Uuid, JobError> {
        let jobs = Arc::clone(&self.jobs);

        let job = Job::new_async(
            self.config.expiration_reminder_cron.as_str(),
            move |_uuid, _l| {
                let jobs = Arc::clone(&jobs);
                Box::pin(async move {
                    let now = Utc::now().naive_utc();
                    info!("Running expiration reminder scan at {}", now);

                    // Failures stay here; the next tick runs regardless
                    match jobs.check_subscription_expirations().await {
                        Ok(outcome) => info!("Expiration reminder scan: {}", outcome),
                        Err(e) => error!("Expiration reminder scan failed: {}", e),
                    }
                })
            },
        )
        .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        let job_id = self
            .scheduler
            .add(job)
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        info!(
            "Added expiration reminder job (schedule: {})",
            self.config.expiration_reminder_cron
        );

        Ok(job_id)
    }

    /// Run the expiration reminder scan immediately (useful for testing or manual triggers).
    pub async fn run_expiration_check_now(&self) -> Result<String, JobError> {
        self.jobs.check_subscription_expirations().await
    }
}
