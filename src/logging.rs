//! Structured logging for the notification jobs.
//!
//! This module provides:
//! - subscriber setup driven by [`LoggingConfig`]
//! - a notification event log, one span per email sent or skipped
//!
//! # Usage
//!
//! ```rust,ignore
//! use notifications::logging::{init_logging, log_notification_event, NotificationEvent};
//!
//! init_logging(&config.logging)?;
//! log_notification_event(NotificationEvent::WelcomeSent, 42, Some("user@example.com"));
//! ```

use tracing::{info, info_span, warn};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::errors::{NotificationError, NotificationResult};

/// Notification outcomes worth an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// Welcome email handed to the transport
    WelcomeSent,
    /// Expiration reminder handed to the transport
    ReminderSent,
    /// Status-update email handed to the transport
    StatusUpdateSent,
    /// Nothing sent because the user does not exist
    UserMissing,
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationEvent::WelcomeSent => "welcome_sent",
            NotificationEvent::ReminderSent => "reminder_sent",
            NotificationEvent::StatusUpdateSent => "status_update_sent",
            NotificationEvent::UserMissing => "user_missing",
        };
        write!(f, "{}", s)
    }
}

/// Log a notification event for `user_id`.
///
/// # Arguments
///
/// * `event` - What happened
/// * `user_id` - The user the email was meant for
/// * `details` - Optional extra context, usually the recipient address
pub fn log_notification_event(event: NotificationEvent, user_id: i64, details: Option<&str>) {
    let span = info_span!(
        "notification_event",
        event = %event,
        user_id = user_id,
    );
    let _enter = span.enter();

    match event {
        NotificationEvent::UserMissing => warn!("Notification skipped"),
        _ => {
            if let Some(d) = details {
                info!(details = %d, "Notification sent");
            } else {
                info!("Notification sent");
            }
        }
    }
}

/// Generate an id that ties together the log lines of one job run.
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Build the filter used by [`init_logging`].
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()))
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> NotificationResult<()> {
    let filter = build_filter(config);

    let result = if config.json {
        fmt().json().with_env_filter(filter).with_target(true).try_init()
    } else {
        fmt().with_env_filter(filter).with_target(true).try_init()
    };

    result.map_err(|e| NotificationError::ConfigError(format!("failed to initialize logging: {e}")))
}
