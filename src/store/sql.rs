use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::query_as;
use tracing::{debug, error};

use super::{Database, NotificationStore};
use crate::config::DatabaseConfig;
use crate::errors::{NotificationError, NotificationResult};
use crate::models::{DashboardRow, SubscriptionDashboard, SubscriptionStatus, User};

/// Names of the tables owned by the web application.
///
/// Callers must pass validated identifiers; they are interpolated into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub users: String,
    pub dashboards: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

impl From<&DatabaseConfig> for TableNames {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            users: config.users_table.clone(),
            dashboards: config.dashboards_table.clone(),
        }
    }
}

/// [`NotificationStore`] backed by the application's SQL database.
#[derive(Debug, Clone)]
pub struct SqlStore {
    db: Database,
    tables: TableNames,
}

impl SqlStore {
    pub fn new(db: Database, tables: TableNames) -> Self {
        Self { db, tables }
    }
}

fn db_err(op: &str, backend: &str, e: sqlx::Error) -> NotificationError {
    error!("{backend} {op} failed: {e}");
    NotificationError::DatabaseError(format!("database error: {e}"))
}

#[async_trait]
impl NotificationStore for SqlStore {
    async fn get_user(&self, user_id: i64) -> NotificationResult<Option<User>> {
        let users = &self.tables.users;

        match &self.db {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                let sql = format!("SELECT id, username, email FROM {users} WHERE id = ?");
                query_as::<_, User>(&sql)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| db_err("get_user", "SQLite", e))
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                let sql = format!(
                    "SELECT id::BIGINT AS id, username, email FROM {users} WHERE id = $1"
                );
                query_as::<_, User>(&sql)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| db_err("get_user", "Postgres", e))
            }
        }
    }

    async fn get_dashboards_ending_on(
        &self,
        status: SubscriptionStatus,
        end_date: NaiveDate,
    ) -> NotificationResult<Vec<SubscriptionDashboard>> {
        let TableNames { users, dashboards } = &self.tables;

        debug!(status = %status, end_date = %end_date, "Querying dashboards by end date");

        let rows = match &self.db {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                let sql = format!(
                    r#"
                    SELECT d.id AS dashboard_id,
                           u.id AS user_id,
                           u.username,
                           u.email,
                           d.subscription_status,
                           d.subscription_end_date
                    FROM {dashboards} d
                    JOIN {users} u ON u.id = d.user_id
                    WHERE d.subscription_status = ?
                      AND d.subscription_end_date = ?
                    ORDER BY d.id
                    "#
                );
                query_as::<_, DashboardRow>(&sql)
                    .bind(status.as_str())
                    .bind(end_date)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_err("get_dashboards_ending_on", "SQLite", e))?
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                let sql = format!(
                    r#"
                    SELECT d.id::BIGINT AS dashboard_id,
                           u.id::BIGINT AS user_id,
                           u.username,
                           u.email,
                           d.subscription_status,
                           d.subscription_end_date
                    FROM {dashboards} d
                    JOIN {users} u ON u.id = d.user_id
                    WHERE d.subscription_status = $1
                      AND d.subscription_end_date = $2
                    ORDER BY d.id
                    "#
                );
                query_as::<_, DashboardRow>(&sql)
                    .bind(status.as_str())
                    .bind(end_date)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_err("get_dashboards_ending_on", "Postgres", e))?
            }
        };

        Ok(rows.into_iter().map(SubscriptionDashboard::from).collect())
    }
}
