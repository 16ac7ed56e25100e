//! Addis Temari notifications - background jobs that send the application's emails
//!
//! # Jobs
//!
//! - welcome email for a newly registered user
//! - subscription expiration reminder, seven days before the end date
//! - application status update notice
//!
//! # Features
//!
//! - `sqlite` - SQLite database backend. Enabled by default.
//! - `postgres` - PostgreSQL database backend.
//! - `background-jobs` - Cron scheduler and the `notification_worker` binary. Enabled by default.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notifications::{config::get_config, jobs::NotificationJobs, mail::SmtpMailer};
//! use notifications::store::{Database, SqlStore, TableNames};
//!
//! let config = get_config()?;
//! let db = Database::connect(&config.database).await?;
//! let store = SqlStore::new(db, TableNames::from(&config.database));
//! let mailer = SmtpMailer::new(&config.smtp)?;
//!
//! let jobs = NotificationJobs::with_system_clock(Arc::new(store), Arc::new(mailer), config.mail.clone());
//! println!("{}", jobs.check_subscription_expirations().await?);
//! ```

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one database backend: the 'sqlite' or 'postgres' feature");

pub mod clock;
pub mod commands;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod logging;
pub mod mail;
pub mod models;
pub mod store;
pub mod templates;

pub use errors::{NotificationError, NotificationResult};
pub use jobs::{JobError, NotificationJobs};
