use sqlx::query_scalar;
use tracing::error;

#[cfg(feature = "sqlite")]
use sqlx::SqlitePool;

#[cfg(feature = "postgres")]
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::errors::{NotificationError, NotificationResult};

/// Connection pool over SQLite or Postgres.
///
/// Available variants depend on enabled features:
/// - `sqlite` feature enables `Database::SQLite`
/// - `postgres` feature enables `Database::Postgres`
#[derive(Debug, Clone)]
pub enum Database {
    #[cfg(feature = "sqlite")]
    SQLite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
}

impl Database {
    /// Connect to the database described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> NotificationResult<Self> {
        match config.db_type.as_str() {
            #[cfg(feature = "sqlite")]
            "sqlite" => {
                let pool = SqlitePool::connect(&config.sqlite_url).await.map_err(|e| {
                    error!("Failed to connect to SQLite: {e}");
                    NotificationError::DatabaseError(format!("failed to connect to SQLite: {e}"))
                })?;

                Ok(Database::SQLite(pool))
            }
            #[cfg(not(feature = "sqlite"))]
            "sqlite" => Err(NotificationError::ConfigError(
                "SQLite support not compiled in. Enable the 'sqlite' feature.".to_string(),
            )),
            #[cfg(feature = "postgres")]
            "postgres" => {
                let pool = PgPool::connect(&config.postgres_url).await.map_err(|e| {
                    error!("Failed to connect to PostgreSQL: {e}");
                    NotificationError::DatabaseError(format!(
                        "failed to connect to PostgreSQL: {e}"
                    ))
                })?;

                Ok(Database::Postgres(pool))
            }
            #[cfg(not(feature = "postgres"))]
            "postgres" => Err(NotificationError::ConfigError(
                "PostgreSQL support not compiled in. Enable the 'postgres' feature.".to_string(),
            )),
            other => Err(NotificationError::ConfigError(format!(
                "unsupported database type: {other}"
            ))),
        }
    }

    /// Backend name for logging.
    pub fn db_type(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Database::Postgres(_) => "postgres",
        }
    }

    /// Run a trivial query to confirm the pool can reach the server.
    pub async fn ping(&self) -> NotificationResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
            }
        }
        Ok(())
    }
}
