//! Fixed-text messages sent by the notification jobs.

use crate::models::User;

/// Number of days before the end date that the expiration reminder is sent.
pub const REMINDER_LEAD_DAYS: i64 = 7;

/// A fully composed email ready for the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub body: String,
    pub from_address: String,
    pub to: Vec<String>,
}

/// Welcome email for a newly registered user.
pub fn welcome_email(user: &User, from_address: &str) -> OutgoingEmail {
    OutgoingEmail {
        subject: "Welcome to Addis Temari!".to_string(),
        body: format!(
            "Hi {},\n\nThank you for registering at Addis Temari. We are excited to have you on board. \
             Explore universities and start planning your future today!\n\n\
             Best regards,\nThe Addis Temari Team",
            user.username
        ),
        from_address: from_address.to_string(),
        to: vec![user.email.clone()],
    }
}

/// Reminder sent when a subscription ends in [`REMINDER_LEAD_DAYS`] days.
pub fn expiration_reminder_email(user: &User, from_address: &str) -> OutgoingEmail {
    OutgoingEmail {
        subject: "Your Addis Temari Subscription is Expiring Soon".to_string(),
        body: format!(
            "Hi {},\n\nYour subscription to Addis Temari is set to expire in {} days. \
             Please renew your subscription to continue enjoying uninterrupted access to all our features.\n\n\
             Best regards,\nThe Addis Temari Team",
            user.username, REMINDER_LEAD_DAYS
        ),
        from_address: from_address.to_string(),
        to: vec![user.email.clone()],
    }
}

/// Notice that an application's status at an institution changed.
pub fn status_update_email(
    user: &User,
    institution_name: &str,
    new_status: &str,
    dashboard_url: &str,
    from_address: &str,
) -> OutgoingEmail {
    let display_status = format_status(new_status);

    OutgoingEmail {
        subject: format!("Application Status Update for {institution_name}"),
        body: format!(
            "Hi {},\n\nYour application status for {institution_name} has been updated to: \"{display_status}\".\n\n\
             You can view your updated dashboard here: {dashboard_url}\n\n\
             Best of luck!\nThe Addis Temari Team",
            user.username
        ),
        from_address: from_address.to_string(),
        to: vec![user.email.clone()],
    }
}

/// Turn a status code like `under_review` into `Under Review`.
///
/// Underscores become spaces, then every letter that follows a non-letter is
/// uppercased and every other letter lowercased.
pub fn format_status(status: &str) -> String {
    let mut out = String::with_capacity(status.len());
    let mut prev_is_letter = false;

    for c in status.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "selam".to_string(),
            email: "selam@example.com".to_string(),
        }
    }

    #[test]
    fn format_status_title_cases_words() {
        assert_eq!(format_status("under_review"), "Under Review");
        assert_eq!(format_status("accepted"), "Accepted");
        assert_eq!(format_status("ACCEPTED"), "Accepted");
        assert_eq!(format_status("waitlisted_round_2"), "Waitlisted Round 2");
        assert_eq!(format_status("pre-screening"), "Pre-Screening");
        assert_eq!(format_status(""), "");
    }

    #[test]
    fn welcome_email_addresses_the_user() {
        let email = welcome_email(&user(), "noreply@addistemari.com");
        assert_eq!(email.subject, "Welcome to Addis Temari!");
        assert!(email.body.starts_with("Hi selam,\n\nThank you for registering at Addis Temari."));
        assert!(email.body.ends_with("Best regards,\nThe Addis Temari Team"));
        assert_eq!(email.to, vec!["selam@example.com".to_string()]);
        assert_eq!(email.from_address, "noreply@addistemari.com");
    }

    #[test]
    fn reminder_mentions_seven_days() {
        let email = expiration_reminder_email(&user(), "noreply@addistemari.com");
        assert_eq!(email.subject, "Your Addis Temari Subscription is Expiring Soon");
        assert!(email.body.contains("set to expire in 7 days."));
    }

    #[test]
    fn status_update_names_institution_and_status() {
        let email = status_update_email(
            &user(),
            "MIT",
            "under_review",
            "https://addistemari.com/dashboard",
            "noreply@addistemari.com",
        );
        assert_eq!(email.subject, "Application Status Update for MIT");
        assert!(email
            .body
            .contains("Your application status for MIT has been updated to: \"Under Review\"."));
        assert!(email
            .body
            .contains("You can view your updated dashboard here: https://addistemari.com/dashboard"));
        assert!(email.body.ends_with("Best of luck!\nThe Addis Temari Team"));
    }
}
