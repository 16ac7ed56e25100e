//! On-demand invocations of the notification jobs.
//!
//! The web application triggers jobs with plain scalar arguments. The worker
//! binary accepts the same arguments on its command line.
//!
//! # Supported Commands
//!
//! ```text
//! notification_worker welcome <user_id>
//! notification_worker status-update <user_id> <institution> <status>
//! notification_worker check-expirations [--date|-d YYYY-MM-DD]
//! ```
//!
//! With no command the worker runs the scheduler.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::FixedClock;
use crate::jobs::{JobError, NotificationJobs};

/// Usage text printed for malformed command lines.
pub const USAGE: &str = "\
usage:
  notification_worker                                        run the scheduler
  notification_worker welcome <user_id>
  notification_worker status-update <user_id> <institution> <status>
  notification_worker check-expirations [--date|-d YYYY-MM-DD]";

/// A parsed worker command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Run the cron scheduler until interrupted
    Schedule,
    /// Send the welcome email
    Welcome { user_id: i64 },
    /// Send an application status update
    StatusUpdate {
        user_id: i64,
        institution_name: String,
        new_status: String,
    },
    /// Run the expiration reminder scan once, optionally as if today were `date`
    CheckExpirations { date: Option<NaiveDate> },
}

fn parse_user_id(value: &str) -> Result<i64, String> {
    value
        .parse::<i64>()
        .map_err(|_| format!("invalid user id '{value}'"))
}

/// Parse `args` (including the program name) into a [`WorkerCommand`].
pub fn parse_worker_command(args: &[String]) -> Result<WorkerCommand, String> {
    let Some(command) = args.get(1) else {
        return Ok(WorkerCommand::Schedule);
    };

    match command.as_str() {
        "welcome" => match &args[2..] {
            [user_id] => Ok(WorkerCommand::Welcome {
                user_id: parse_user_id(user_id)?,
            }),
            _ => Err("welcome requires exactly one <user_id>".to_string()),
        },
        "status-update" => match &args[2..] {
            [user_id, institution, status] => Ok(WorkerCommand::StatusUpdate {
                user_id: parse_user_id(user_id)?,
                institution_name: institution.clone(),
                new_status: status.clone(),
            }),
            _ => Err("status-update requires <user_id> <institution> <status>".to_string()),
        },
        "check-expirations" => match &args[2..] {
            [] => Ok(WorkerCommand::CheckExpirations { date: None }),
            [flag, value] if flag == "--date" || flag == "-d" => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|e| format!("invalid --date '{value}': {e}"))?;
                Ok(WorkerCommand::CheckExpirations { date: Some(date) })
            }
            _ => Err("check-expirations accepts only --date|-d YYYY-MM-DD".to_string()),
        },
        other => Err(format!("unknown command '{other}'")),
    }
}

/// Run a one-shot command and return the job's outcome message.
///
/// [`WorkerCommand::Schedule`] is not a one-shot command and is rejected.
pub async fn execute_command(jobs: &NotificationJobs, cmd: WorkerCommand) -> Result<String, JobError> {
    match cmd {
        WorkerCommand::Welcome { user_id } => jobs.send_welcome(user_id).await,
        WorkerCommand::StatusUpdate {
            user_id,
            institution_name,
            new_status,
        } => {
            jobs.send_application_status_update(user_id, &institution_name, &new_status)
                .await
        }
        WorkerCommand::CheckExpirations { date: None } => jobs.check_subscription_expirations().await,
        WorkerCommand::CheckExpirations { date: Some(date) } => {
            jobs.clone()
                .with_clock(Arc::new(FixedClock(date)))
                .check_subscription_expirations()
                .await
        }
        WorkerCommand::Schedule => Err(JobError::ExecutionError(
            "the scheduler is not a one-shot command".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("notification_worker")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn usage_lists_both_date_flags() {
        assert!(USAGE.contains("--date|-d YYYY-MM-DD"));
        assert_eq!(
            parse_worker_command(&args(&["check-expirations", "--date", "2025-01-31"])),
            parse_worker_command(&args(&["check-expirations", "-d", "2025-01-31"]))
        );
    }

    #[test]
    fn no_arguments_runs_the_scheduler() {
        assert_eq!(parse_worker_command(&args(&[])), Ok(WorkerCommand::Schedule));
    }

    #[test]
    fn parses_welcome() {
        assert_eq!(
            parse_worker_command(&args(&["welcome", "42"])),
            Ok(WorkerCommand::Welcome { user_id: 42 })
        );
        assert!(parse_worker_command(&args(&["welcome", "abc"])).is_err());
        assert!(parse_worker_command(&args(&["welcome"])).is_err());
    }

    #[test]
    fn parses_status_update_with_spaces_in_institution() {
        assert_eq!(
            parse_worker_command(&args(&["status-update", "7", "Addis Ababa University", "under_review"])),
            Ok(WorkerCommand::StatusUpdate {
                user_id: 7,
                institution_name: "Addis Ababa University".to_string(),
                new_status: "under_review".to_string(),
            })
        );
        assert!(parse_worker_command(&args(&["status-update", "7", "MIT"])).is_err());
    }

    #[test]
    fn parses_check_expirations_with_optional_date() {
        assert_eq!(
            parse_worker_command(&args(&["check-expirations"])),
            Ok(WorkerCommand::CheckExpirations { date: None })
        );
        assert_eq!(
            parse_worker_command(&args(&["check-expirations", "--date", "2025-06-01"])),
            Ok(WorkerCommand::CheckExpirations {
                date: NaiveDate::from_ymd_opt(2025, 6, 1)
            })
        );
        assert!(parse_worker_command(&args(&["check-expirations", "--date", "June 1"])).is_err());
    }

    #[test]
    fn rejects_unknown_command() {
        let err = parse_worker_command(&args(&["purge"])).unwrap_err();
        assert!(err.contains("purge"));
    }
}
