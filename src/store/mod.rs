//! Read access to the user and subscription tables.
//!
//! - `database` → connection pool over SQLite/Postgres
//! - `sql`      → [`NotificationStore`] implementation on top of it

pub mod database;
mod sql;

pub use database::Database;
pub use sql::{SqlStore, TableNames};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::NotificationResult;
use crate::models::{SubscriptionDashboard, SubscriptionStatus, User};

/// Queries the notification jobs run against the application's data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Fetch a user by id. `Ok(None)` when no such user exists.
    async fn get_user(&self, user_id: i64) -> NotificationResult<Option<User>>;

    /// Dashboards in `status` whose end date is exactly `end_date`, owners included.
    async fn get_dashboards_ending_on(
        &self,
        status: SubscriptionStatus,
        end_date: NaiveDate,
    ) -> NotificationResult<Vec<SubscriptionDashboard>>;
}
