//! Records read from the user and subscription tables.

use chrono::NaiveDate;
use std::fmt;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Subscription state stored on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Expired,
    /// Any value this crate does not interpret.
    Other(String),
}

impl SubscriptionStatus {
    /// The value stored in the `subscription_status` column.
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Other(s) => s,
        }
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(value: &str) -> Self {
        match value {
            "active" => SubscriptionStatus::Active,
            "inactive" => SubscriptionStatus::Inactive,
            "expired" => SubscriptionStatus::Expired,
            other => SubscriptionStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's subscription record with its owner loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDashboard {
    pub id: i64,
    pub user: User,
    pub subscription_status: SubscriptionStatus,
    pub subscription_end_date: Option<NaiveDate>,
}

/// Flat row produced by the dashboard/user join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct DashboardRow {
    pub dashboard_id: i64,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub subscription_status: String,
    pub subscription_end_date: Option<NaiveDate>,
}

impl From<DashboardRow> for SubscriptionDashboard {
    fn from(row: DashboardRow) -> Self {
        Self {
            id: row.dashboard_id,
            user: User {
                id: row.user_id,
                username: row.username,
                email: row.email,
            },
            subscription_status: SubscriptionStatus::from(row.subscription_status.as_str()),
            subscription_end_date: row.subscription_end_date,
        }
    }
}
