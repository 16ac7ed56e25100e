//! Configuration for the notification worker.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `config.toml` file
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `NOTIFY_DATABASE_TYPE` - Database backend (`sqlite` or `postgres`)
//! - `NOTIFY_DATABASE_URL` - Database connection URL
//! - `NOTIFY_SMTP_HOST` / `NOTIFY_SMTP_PORT` - SMTP relay address
//! - `NOTIFY_SMTP_USERNAME` / `NOTIFY_SMTP_PASSWORD` - SMTP credentials
//! - `NOTIFY_SMTP_USE_TLS` - Use TLS when talking to the relay
//! - `NOTIFY_MAIL_FROM` - Sender address for every email
//! - `NOTIFY_DASHBOARD_URL` - Link included in status-update emails
//! - `NOTIFY_EXPIRATION_CRON` - Schedule of the expiration-reminder scan
//! - `NOTIFY_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
//! - `NOTIFY_LOG_JSON` - Emit JSON log lines

use config::Config;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::sync::OnceLock;

use crate::errors::{NotificationError, NotificationResult};

/// Global configuration singleton.
static CONFIG: OnceLock<NotificationsConfig> = OnceLock::new();

/// Default sender for every email.
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@addistemari.com";

/// Default dashboard link for status-update emails.
pub const DEFAULT_DASHBOARD_URL: &str = "https://addistemari.com/dashboard";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// SMTP relay configuration
    pub smtp: SmtpConfig,
    /// Sender and link settings used when composing emails
    pub mail: MailSettings,
    /// Scheduler configuration
    pub jobs: JobsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database type: "sqlite" or "postgres"
    pub db_type: String,
    /// SQLite connection URL
    pub sqlite_url: String,
    /// PostgreSQL connection URL
    pub postgres_url: String,
    /// Table holding user accounts
    pub users_table: String,
    /// Table holding subscription dashboards
    pub dashboards_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: "sqlite".to_string(),
            sqlite_url: "sqlite://addis_temari.db".to_string(),
            postgres_url: "postgres://localhost/addis_temari".to_string(),
            users_table: "auth_user".to_string(),
            dashboards_table: "universities_userdashboard".to_string(),
        }
    }
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host
    pub host: String,
    /// Relay port
    pub port: u16,
    /// Optional username
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
    /// Use TLS (false for local relays like Mailpit)
    pub use_tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1025,
            username: None,
            password: None,
            use_tls: false,
        }
    }
}

/// Sender and link settings used when composing emails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    /// Sender address for every email
    pub from_address: String,
    /// Link to the user dashboard
    pub dashboard_url: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Cron expression for the expiration-reminder scan (default: daily at 08:00 UTC)
    pub expiration_reminder_cron: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            expiration_reminder_cron: "0 0 8 * * *".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON instead of human-readable lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn config_err(e: config::ConfigError) -> NotificationError {
    NotificationError::ConfigError(e.to_string())
}

impl NotificationsConfig {
    /// Load configuration from file and environment.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` file (optional)
    /// 3. Environment variables
    pub fn load() -> NotificationResult<Self> {
        let builder = Config::builder()
            .set_default("database.db_type", "sqlite")
            .map_err(config_err)?
            .set_default("database.sqlite_url", "sqlite://addis_temari.db")
            .map_err(config_err)?
            .set_default("database.postgres_url", "postgres://localhost/addis_temari")
            .map_err(config_err)?
            .set_default("database.users_table", "auth_user")
            .map_err(config_err)?
            .set_default("database.dashboards_table", "universities_userdashboard")
            .map_err(config_err)?
            .set_default("smtp.host", "localhost")
            .map_err(config_err)?
            .set_default("smtp.port", 1025)
            .map_err(config_err)?
            .set_default("smtp.use_tls", false)
            .map_err(config_err)?
            .set_default("mail.from_address", DEFAULT_FROM_ADDRESS)
            .map_err(config_err)?
            .set_default("mail.dashboard_url", DEFAULT_DASHBOARD_URL)
            .map_err(config_err)?
            .set_default("jobs.expiration_reminder_cron", "0 0 8 * * *")
            .map_err(config_err)?
            .set_default("logging.level", "info")
            .map_err(config_err)?
            .set_default("logging.json", false)
            .map_err(config_err)?
            // Load from config.toml (optional)
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables
            .set_override_option("database.db_type", env::var("NOTIFY_DATABASE_TYPE").ok())
            .map_err(config_err)?
            .set_override_option(
                "database.sqlite_url",
                env::var("NOTIFY_DATABASE_URL")
                    .ok()
                    .filter(|url| url.starts_with("sqlite")),
            )
            .map_err(config_err)?
            .set_override_option(
                "database.postgres_url",
                env::var("NOTIFY_DATABASE_URL")
                    .ok()
                    .filter(|url| url.starts_with("postgres")),
            )
            .map_err(config_err)?
            .set_override_option("smtp.host", env::var("NOTIFY_SMTP_HOST").ok())
            .map_err(config_err)?
            .set_override_option(
                "smtp.port",
                env::var("NOTIFY_SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok()),
            )
            .map_err(config_err)?
            .set_override_option("smtp.username", env::var("NOTIFY_SMTP_USERNAME").ok())
            .map_err(config_err)?
            .set_override_option("smtp.password", env::var("NOTIFY_SMTP_PASSWORD").ok())
            .map_err(config_err)?
            .set_override_option(
                "smtp.use_tls",
                env::var("NOTIFY_SMTP_USE_TLS")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok()),
            )
            .map_err(config_err)?
            .set_override_option("mail.from_address", env::var("NOTIFY_MAIL_FROM").ok())
            .map_err(config_err)?
            .set_override_option("mail.dashboard_url", env::var("NOTIFY_DASHBOARD_URL").ok())
            .map_err(config_err)?
            .set_override_option(
                "jobs.expiration_reminder_cron",
                env::var("NOTIFY_EXPIRATION_CRON").ok(),
            )
            .map_err(config_err)?
            .set_override_option("logging.level", env::var("NOTIFY_LOG_LEVEL").ok())
            .map_err(config_err)?
            .set_override_option(
                "logging.json",
                env::var("NOTIFY_LOG_JSON")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok()),
            )
            .map_err(config_err)?;

        let settings = builder.build().map_err(|e| {
            NotificationError::ConfigError(format!("failed to build config: {e}"))
        })?;

        settings.try_deserialize().map_err(|e| {
            NotificationError::ConfigError(format!("failed to deserialize config: {e}"))
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> NotificationResult<()> {
        match self.database.db_type.as_str() {
            "sqlite" | "postgres" => {}
            other => {
                return Err(NotificationError::ConfigError(format!(
                    "database.db_type must be 'sqlite' or 'postgres', got '{other}'"
                )));
            }
        }

        // Table names are interpolated into SQL, so only plain identifiers are allowed
        let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .map_err(|e| NotificationError::ConfigError(e.to_string()))?;
        for (key, table) in [
            ("database.users_table", &self.database.users_table),
            ("database.dashboards_table", &self.database.dashboards_table),
        ] {
            if !identifier.is_match(table) {
                return Err(NotificationError::ConfigError(format!(
                    "{key} must be a plain SQL identifier, got '{table}'"
                )));
            }
        }

        if self.smtp.port == 0 {
            return Err(NotificationError::ConfigError(
                "smtp.port must be greater than 0".to_string(),
            ));
        }

        if !self.mail.from_address.contains('@') {
            return Err(NotificationError::ConfigError(format!(
                "mail.from_address is not an email address: '{}'",
                self.mail.from_address
            )));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(NotificationError::ConfigError(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

/// Get the global configuration.
///
/// This loads the configuration on first access and caches it.
/// Returns an error if configuration loading or validation fails.
pub fn get_config() -> NotificationResult<&'static NotificationsConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = NotificationsConfig::load()?;
    config.validate()?;

    // Another thread may have won the race; either value is valid
    let _ = CONFIG.set(config);

    CONFIG
        .get()
        .ok_or_else(|| NotificationError::ConfigError("configuration not initialized".to_string()))
}

/// Initialize configuration explicitly.
///
/// Call this early in your application to catch configuration errors.
pub fn init_config() -> NotificationResult<&'static NotificationsConfig> {
    get_config()
}
