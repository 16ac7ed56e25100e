//! Application status update job.

use tracing::debug;

use super::{user_not_found_message, JobError, NotificationJobs};
use crate::logging::{log_notification_event, NotificationEvent};
use crate::templates::status_update_email;

impl NotificationJobs {
    /// Tell `user_id` that their application at `institution_name` moved to
    /// `new_status` (a code such as `under_review`).
    pub async fn send_application_status_update(
        &self,
        user_id: i64,
        institution_name: &str,
        new_status: &str,
    ) -> Result<String, JobError> {
        debug!(user_id, institution = %institution_name, status = %new_status, "Running status update job");

        let Some(user) = self.find_user(user_id).await? else {
            log_notification_event(NotificationEvent::UserMissing, user_id, None);
            return Ok(user_not_found_message(user_id));
        };

        let email = status_update_email(
            &user,
            institution_name,
            new_status,
            &self.settings.dashboard_url,
            &self.settings.from_address,
        );
        self.mailer.send(&email).await?;

        log_notification_event(
            NotificationEvent::StatusUpdateSent,
            user.id,
            Some(&user.email),
        );
        Ok(format!(
            "Application status update email sent to {} for {}.",
            user.email, institution_name
        ))
    }
}
