use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything the forecaster can bucket by calendar day.
///
/// Only the day matters; time-of-day is discarded.
pub trait Timestamped {
    fn calendar_day(&self) -> NaiveDate;
}

/// A bare dated event with no other attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Timestamped for TimeSeriesPoint {
    fn calendar_day(&self) -> NaiveDate {
        self.date
    }
}

impl Timestamped for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl Timestamped for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl Timestamped for DateTime<Utc> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}
