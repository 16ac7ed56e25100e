//! Error types shared by the store, mail and configuration layers.

use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors raised by the collaborators the notification jobs depend on.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No user exists with the given id.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// The user/subscription store failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// The mail transport rejected or failed to deliver a message.
    #[error("Mail transport error: {0}")]
    MailError(String),

    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<sqlx::Error> for NotificationError {
    fn from(err: sqlx::Error) -> Self {
        NotificationError::DatabaseError(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for NotificationError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        NotificationError::MailError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = NotificationError::UserNotFound(42);
        assert_eq!(err.to_string(), "User not found: 42");

        let err = NotificationError::MailError("connection refused".to_string());
        assert_eq!(err.to_string(), "Mail transport error: connection refused");
    }
}
