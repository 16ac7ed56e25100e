//! Shared fixtures: an in-memory SQLite store seeded like the web application's tables.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use notifications::clock::FixedClock;
use notifications::config::MailSettings;
use notifications::jobs::NotificationJobs;
use notifications::mail::MemoryMailer;
use notifications::store::{Database, SqlStore, TableNames};

/// The date every fixture treats as today.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid date")
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

/// Helper: in-memory SQLite pool with the user and dashboard tables.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::query(
        r#"
        CREATE TABLE auth_user (
            id       INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            email    TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("failed to create auth_user table");

    sqlx::query(
        r#"
        CREATE TABLE universities_userdashboard (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id               INTEGER NOT NULL REFERENCES auth_user(id),
            subscription_status   TEXT NOT NULL,
            subscription_end_date DATE
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("failed to create universities_userdashboard table");

    pool
}

pub async fn insert_user(pool: &SqlitePool, id: i64, username: &str, email: &str) {
    sqlx::query("INSERT INTO auth_user (id, username, email) VALUES (?, ?, ?)")
        .bind(id)
        .bind(username)
        .bind(email)
        .execute(pool)
        .await
        .expect("failed to insert user");
}

pub async fn insert_dashboard(
    pool: &SqlitePool,
    user_id: i64,
    status: &str,
    end_date: Option<NaiveDate>,
) {
    sqlx::query(
        "INSERT INTO universities_userdashboard (user_id, subscription_status, subscription_end_date) \
         VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(status)
    .bind(end_date)
    .execute(pool)
    .await
    .expect("failed to insert dashboard");
}

pub fn store(pool: &SqlitePool) -> SqlStore {
    SqlStore::new(Database::SQLite(pool.clone()), TableNames::default())
}

/// Jobs wired to `pool`, a fresh memory outbox and a clock fixed at [`today`].
pub fn jobs(pool: &SqlitePool) -> (NotificationJobs, Arc<MemoryMailer>) {
    let mailer = Arc::new(MemoryMailer::new());
    let jobs = NotificationJobs::new(
        Arc::new(store(pool)),
        mailer.clone(),
        Arc::new(FixedClock(today())),
        MailSettings::default(),
    );
    (jobs, mailer)
}
