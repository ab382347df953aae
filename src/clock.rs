use chrono::{Local, NaiveDate};

/// Source of "today" for entry timestamps and the summary's default date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
