//! Welcome email job.

use tracing::debug;

use super::{user_not_found_message, JobError, NotificationJobs};
use crate::logging::{log_notification_event, NotificationEvent};
use crate::templates::welcome_email;

impl NotificationJobs {
    /// Send the welcome email to `user_id`.
    ///
    /// Returns a description of what happened. An unknown user yields the
    /// not-found message and sends nothing.
    pub async fn send_welcome(&self, user_id: i64) -> Result<String, JobError> {
        debug!(user_id, "Running welcome email job");

        let Some(user) = self.find_user(user_id).await? else {
            log_notification_event(NotificationEvent::UserMissing, user_id, None);
            return Ok(user_not_found_message(user_id));
        };

        let email = welcome_email(&user, &self.settings.from_address);
        self.mailer.send(&email).await?;

        log_notification_event(NotificationEvent::WelcomeSent, user.id, Some(&user.email));
        Ok(format!("Welcome email sent to {}", user.email))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::clock::FixedClock;
    use crate::config::MailSettings;
    use crate::errors::NotificationError;
    use crate::mail::MockMailer;
    use crate::models::User;
    use crate::store::MockNotificationStore;

    fn jobs(store: MockNotificationStore, mailer: MockMailer) -> NotificationJobs {
        NotificationJobs::new(
            Arc::new(store),
            Arc::new(mailer),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())),
            MailSettings::default(),
        )
    }

    fn hana() -> User {
        User {
            id: 5,
            username: "hana".to_string(),
            email: "hana@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn sends_one_email_to_the_user() {
        let mut store = MockNotificationStore::new();
        store
            .expect_get_user()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(Some(hana())));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.to == vec!["hana@example.com".to_string()]
                    && email.from_address == "noreply@addistemari.com"
                    && email.subject == "Welcome to Addis Temari!"
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = jobs(store, mailer).send_welcome(5).await.unwrap();
        assert_eq!(outcome, "Welcome email sent to hana@example.com");
    }

    #[tokio::test]
    async fn missing_user_sends_nothing() {
        let mut store = MockNotificationStore::new();
        store.expect_get_user().returning(|_| Ok(None));

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let outcome = jobs(store, mailer).send_welcome(99).await.unwrap();
        assert_eq!(outcome, "User with id 99 does not exist.");
    }

    #[tokio::test]
    async fn store_reporting_user_not_found_is_recovered() {
        let mut store = MockNotificationStore::new();
        store
            .expect_get_user()
            .returning(|id| Err(NotificationError::UserNotFound(id)));

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let outcome = jobs(store, mailer).send_welcome(3).await.unwrap();
        assert_eq!(outcome, "User with id 3 does not exist.");
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let mut store = MockNotificationStore::new();
        store.expect_get_user().returning(|_| Ok(Some(hana())));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(NotificationError::MailError("relay down".to_string())));

        let err = jobs(store, mailer).send_welcome(5).await.unwrap_err();
        assert!(matches!(err, JobError::MailError(_)));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut store = MockNotificationStore::new();
        store
            .expect_get_user()
            .returning(|_| Err(NotificationError::DatabaseError("unavailable".to_string())));

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let err = jobs(store, mailer).send_welcome(5).await.unwrap_err();
        assert!(matches!(err, JobError::DatabaseError(_)));
    }
}
