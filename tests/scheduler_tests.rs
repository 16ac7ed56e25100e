//! Integration tests for the job scheduler.
//!
//! These tests require the `background-jobs` feature to be enabled.

#![cfg(feature = "background-jobs")]

mod common;

use std::time::Duration;

use common::{days_from_today, insert_dashboard, insert_user, jobs, setup_pool};
use notifications::jobs::{JobConfig, JobError, JobScheduler};

fn every_second() -> JobConfig {
    JobConfig {
        expiration_reminder_cron: "*/1 * * * * *".to_string(),
    }
}

#[tokio::test]
async fn manual_trigger_runs_expiration_scan() {
    let pool = setup_pool().await;
    insert_user(&pool, 1, "due", "due@example.com").await;
    insert_dashboard(&pool, 1, "active", Some(days_from_today(7))).await;
    let (jobs, mailer) = jobs(&pool);

    let scheduler = JobScheduler::new(jobs, JobConfig::default())
        .await
        .expect("failed to create scheduler");
    let outcome = scheduler.run_expiration_check_now().await.expect("scan failed");

    assert_eq!(outcome, "Sent 1 subscription reminders.");
    assert_eq!(mailer.sent_count(), 1);
}

#[tokio::test]
async fn invalid_cron_expression_is_rejected_on_start() {
    let pool = setup_pool().await;
    let (jobs, _mailer) = jobs(&pool);

    let config = JobConfig {
        expiration_reminder_cron: "every morning".to_string(),
    };
    let scheduler = JobScheduler::new(jobs, config)
        .await
        .expect("failed to create scheduler");

    let err = scheduler.start().await.unwrap_err();
    assert!(matches!(err, JobError::SchedulerError(_)));
}

#[tokio::test]
async fn scheduler_starts_and_shuts_down() {
    let pool = setup_pool().await;
    let (jobs, mailer) = jobs(&pool);

    let mut scheduler = JobScheduler::new(jobs, JobConfig::default())
        .await
        .expect("failed to create scheduler");
    scheduler.start().await.expect("failed to start");
    scheduler.shutdown().await.expect("failed to shut down");

    // Daily schedule never fires during the test
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_start_is_rejected_without_duplicating_the_job() {
    let pool = setup_pool().await;
    insert_user(&pool, 1, "due", "due@example.com").await;
    insert_dashboard(&pool, 1, "active", Some(days_from_today(7))).await;
    let (jobs, mailer) = jobs(&pool);

    let mut scheduler = JobScheduler::new(jobs, every_second())
        .await
        .expect("failed to create scheduler");
    scheduler.start().await.expect("failed to start");

    let err = scheduler.start().await.unwrap_err();
    assert!(matches!(err, JobError::SchedulerError(ref msg) if msg.contains("already started")));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    scheduler.shutdown().await.expect("failed to shut down");

    // At most four ticks fit in the window; a second job would double every one
    let sent = mailer.sent_to("due@example.com").len();
    assert!((1..=4).contains(&sent), "sent {sent} reminders");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_tick_does_not_stop_later_ticks() {
    let pool = setup_pool().await;
    insert_user(&pool, 1, "due", "due@example.com").await;
    insert_dashboard(&pool, 1, "active", Some(days_from_today(7))).await;
    let (jobs, mailer) = jobs(&pool);
    mailer.fail_with("connection refused");

    let mut scheduler = JobScheduler::new(jobs, every_second())
        .await
        .expect("failed to create scheduler");
    scheduler.start().await.expect("failed to start");

    tokio::time::sleep(Duration::from_millis(2200)).await;
    assert_eq!(mailer.sent_count(), 0);

    mailer.recover();
    tokio::time::sleep(Duration::from_millis(2200)).await;
    scheduler.shutdown().await.expect("failed to shut down");

    assert!(mailer.sent_count() >= 1);
    assert!(mailer
        .sent()
        .iter()
        .all(|email| email.to == vec!["due@example.com".to_string()]));
}
