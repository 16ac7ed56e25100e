//! In-memory mail transport.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

use super::Mailer;
use crate::errors::{NotificationError, NotificationResult};
use crate::templates::OutgoingEmail;

/// Records every email instead of delivering it.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<OutgoingEmail>>,
    failure: Mutex<Option<String>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send` fail with `reason` until [`MemoryMailer::recover`].
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }

    /// Accept emails again after [`MemoryMailer::fail_with`].
    pub fn recover(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Snapshot of everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Emails addressed to `address`.
    pub fn sent_to(&self, address: &str) -> Vec<OutgoingEmail> {
        self.sent()
            .into_iter()
            .filter(|email| email.to.iter().any(|to| to == address))
            .collect()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> NotificationResult<()> {
        if let Some(reason) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(NotificationError::MailError(reason));
        }

        debug!(to = ?email.to, subject = %email.subject, "Recording email in memory outbox");
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(email.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
