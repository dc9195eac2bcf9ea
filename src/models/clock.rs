//! Source of the current date-time for reviews.
//! Allows overriding "today" to simulate the passing of days.

use chrono::{Local, NaiveDate, NaiveDateTime};

pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Keeps the current time of day but moves the date to `date`.
    pub fn on_date(date: NaiveDate) -> Self {
        FixedClock(date.and_time(Local::now().time()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_on_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let clock = FixedClock::on_date(date);

        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), clock.now());
    }
}
