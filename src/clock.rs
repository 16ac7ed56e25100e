//! Time source for the jobs that depend on "today".

use chrono::{NaiveDate, Utc};

/// Supplies the current calendar date.
pub trait Clock: Send + Sync {
    /// Today's date (UTC).
    fn today(&self) -> NaiveDate;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date.
///
/// Used by tests and by the worker's `--date` override to replay a scan for a
/// given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
