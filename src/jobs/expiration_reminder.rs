//! Subscription expiration reminder job.
//!
//! Finds dashboards in 'active' status whose end date is exactly
//! [`REMINDER_LEAD_DAYS`] days after today and emails each owner once.
//!
//! Matching is by exact date, so the job must run once per day: a skipped day
//! never reminds that day's subscribers, and two runs on the same day remind
//! them twice.

use chrono::{Days, NaiveDate};
use tracing::{debug, info, info_span, Instrument};

use super::{JobError, NotificationJobs};
use crate::logging::{generate_run_id, log_notification_event, NotificationEvent};
use crate::models::SubscriptionStatus;
use crate::templates::{expiration_reminder_email, REMINDER_LEAD_DAYS};

/// The end date that triggers a reminder when the scan runs on `today`.
pub fn reminder_target_date(today: NaiveDate) -> Result<NaiveDate, JobError> {
    today
        .checked_add_days(Days::new(REMINDER_LEAD_DAYS as u64))
        .ok_or_else(|| JobError::ExecutionError(format!("reminder date out of range for {today}")))
}

impl NotificationJobs {
    /// Send reminders for subscriptions ending in seven days.
    ///
    /// Returns the number of matching dashboards. A transport failure stops
    /// the scan; reminders already sent are not rolled back.
    pub async fn run_expiration_reminders(&self) -> Result<u32, JobError> {
        let today = self.clock.today();
        let target_date = reminder_target_date(today)?;
        let span = info_span!(
            "expiration_reminders",
            run_id = %generate_run_id(),
            target_date = %target_date,
        );

        async move {
            debug!("Checking for subscriptions ending on {}", target_date);

            let dashboards = self
                .store
                .get_dashboards_ending_on(SubscriptionStatus::Active, target_date)
                .await?;

            let mut count = 0;

            for dashboard in &dashboards {
                let user = &dashboard.user;
                debug!(
                    "Reminding user {} (dashboard {}, ends {:?})",
                    user.id, dashboard.id, dashboard.subscription_end_date
                );

                let email = expiration_reminder_email(user, &self.settings.from_address);
                self.mailer.send(&email).await?;

                log_notification_event(NotificationEvent::ReminderSent, user.id, Some(&user.email));
                count += 1;
            }

            info!("Expiration reminder scan sent {} reminders", count);
            Ok::<u32, JobError>(count)
        }
        .instrument(span)
        .await
    }

    /// Run the expiration reminder scan and describe the result.
    pub async fn check_subscription_expirations(&self) -> Result<String, JobError> {
        let count = self.run_expiration_reminders().await?;
        Ok(format!("Sent {count} subscription reminders."))
    }
}
