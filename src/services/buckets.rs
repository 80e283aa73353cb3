//! Naming of the time-bucketed leaderboard views.
//!
//! A bucket key is `namespace + label + stamp`: `tetrisdaily20261016` for a daily bucket,
//! `tetrisweekly2026w42` for an ISO-week bucket.

use time::{Date, Duration, OffsetDateTime};

use crate::config::BucketGranularity;

/// Source of "today" for bucket naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Current UTC date.
    System,
    /// Pinned date, for replays and tests.
    Fixed(Date),
}

impl Clock {
    /// The date buckets are computed from.
    pub fn today(&self) -> Date {
        match self {
            Clock::System => OffsetDateTime::now_utc().date(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Maps `(namespace, days_old)` to the key of the matching bucketed view.
#[derive(Debug, Clone)]
pub struct BucketCalendar {
    granularity: BucketGranularity,
    clock: Clock,
}

impl BucketCalendar {
    /// Build a calendar for the configured granularity.
    pub fn new(granularity: BucketGranularity, clock: Clock) -> Self {
        Self { granularity, clock }
    }

    /// Granularity used for every key produced by this calendar.
    pub fn granularity(&self) -> BucketGranularity {
        self.granularity
    }

    /// Key of the bucket receiving scores submitted now.
    pub fn current_key(&self, namespace: &str) -> String {
        self.key_for(namespace, 0)
    }

    /// Key of the bucket covering the day `days_old` days before today.
    pub fn key_for(&self, namespace: &str, days_old: u32) -> String {
        let today = self.clock.today();
        let date = today
            .checked_sub(Duration::days(i64::from(days_old)))
            .unwrap_or(Date::MIN);
        format!("{namespace}{}", bucket_suffix(self.granularity, date))
    }
}

fn bucket_suffix(granularity: BucketGranularity, date: Date) -> String {
    match granularity {
        BucketGranularity::Daily => format!(
            "daily{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ),
        BucketGranularity::Weekly => {
            let (year, week, _) = date.to_iso_week_date();
            format!("weekly{year:04}w{week:02}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn fixed(year: i32, month: Month, day: u8) -> Clock {
        Clock::Fixed(Date::from_calendar_date(year, month, day).unwrap())
    }

    #[test]
    fn daily_keys_step_back_one_day_at_a_time() {
        let calendar = BucketCalendar::new(BucketGranularity::Daily, fixed(2026, Month::March, 2));
        assert_eq!(calendar.current_key("g"), "gdaily20260302");
        assert_eq!(calendar.key_for("g", 1), "gdaily20260301");
        assert_eq!(calendar.key_for("g", 2), "gdaily20260228");
    }

    #[test]
    fn weekly_keys_use_iso_weeks() {
        // 2027-01-01 is a Friday that still belongs to ISO week 53 of 2026.
        let calendar =
            BucketCalendar::new(BucketGranularity::Weekly, fixed(2027, Month::January, 1));
        assert_eq!(calendar.current_key("g"), "gweekly2026w53");
        assert_eq!(calendar.key_for("g", 6), "gweekly2026w52");
    }

    #[test]
    fn days_in_the_same_week_share_a_bucket() {
        let calendar =
            BucketCalendar::new(BucketGranularity::Weekly, fixed(2026, Month::October, 16));
        assert_eq!(calendar.key_for("g", 0), calendar.key_for("g", 4));
        assert_ne!(calendar.key_for("g", 0), calendar.key_for("g", 5));
    }
}
