//! Mail transports.
//!
//! The jobs only see the [`Mailer`] trait. [`SmtpMailer`] delivers through an
//! SMTP relay; [`MemoryMailer`] keeps an outbox in memory for tests and dry
//! runs.

mod memory;
mod smtp;

pub use memory::MemoryMailer;
pub use smtp::SmtpMailer;

use async_trait::async_trait;

use crate::errors::NotificationResult;
use crate::templates::OutgoingEmail;

/// Sends a composed email to all of its recipients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email`. Failures are returned to the caller untouched.
    async fn send(&self, email: &OutgoingEmail) -> NotificationResult<()>;

    /// Transport name for logging.
    fn name(&self) -> &'static str;
}
