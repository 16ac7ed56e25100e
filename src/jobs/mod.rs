//! Notification jobs.
//!
//! Three independent operations share a user/subscription store, a mail
//! transport and a time source:
//!
//! - **Welcome**: greets a newly registered user
//! - **Expiration reminder**: finds active subscriptions ending exactly seven
//!   days from today and reminds their owners
//! - **Application status update**: tells a user that an application changed
//!   status at an institution
//!
//! A missing user is not an error: the operation sends nothing and returns a
//! message saying so. Store and transport failures are returned as
//! [`JobError`] for the caller to handle.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notifications::jobs::NotificationJobs;
//!
//! let jobs = NotificationJobs::with_system_clock(store, mailer, config.mail.clone());
//! let outcome = jobs.send_welcome(42).await?;
//! ```

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::MailSettings;
use crate::errors::NotificationError;
use crate::mail::Mailer;
use crate::store::NotificationStore;

mod expiration_reminder;
mod status_update;
mod welcome;

#[cfg(feature = "background-jobs")]
mod scheduler;

#[cfg(feature = "background-jobs")]
pub use scheduler::{JobConfig, JobScheduler};

/// The notification operations and the collaborators they run against.
#[derive(Clone)]
pub struct NotificationJobs {
    store: Arc<dyn NotificationStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    settings: MailSettings,
}

impl NotificationJobs {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        settings: MailSettings,
    ) -> Self {
        Self {
            store,
            mailer,
            clock,
            settings,
        }
    }

    /// Build with the system clock.
    pub fn with_system_clock(
        store: Arc<dyn NotificationStore>,
        mailer: Arc<dyn Mailer>,
        settings: MailSettings,
    ) -> Self {
        Self::new(store, mailer, Arc::new(SystemClock), settings)
    }

    /// Same collaborators, different time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Look up a user, folding "not found" into `None`.
    async fn find_user(&self, user_id: i64) -> Result<Option<crate::models::User>, JobError> {
        match self.store.get_user(user_id).await {
            Ok(user) => Ok(user),
            Err(NotificationError::UserNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Message returned when an operation targets a user that does not exist.
pub fn user_not_found_message(user_id: i64) -> String {
    format!("User with id {user_id} does not exist.")
}

/// Errors that can occur while running a notification job.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Scheduler error: {0}")]
    SchedulerError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Job execution error: {0}")]
    ExecutionError(String),
}

impl From<NotificationError> for JobError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::DatabaseError(_) => JobError::DatabaseError(err.to_string()),
            NotificationError::MailError(_) | NotificationError::InvalidAddress(_) => {
                JobError::MailError(err.to_string())
            }
            NotificationError::UserNotFound(_) | NotificationError::ConfigError(_) => {
                JobError::ExecutionError(err.to_string())
            }
        }
    }
}
