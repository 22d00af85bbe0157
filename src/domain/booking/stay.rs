//! Stay dates and night counting.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Check-in/check-out pair.
///
/// # Invariants
///
/// - `check_out > check_in`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayDates {
    check_in: Timestamp,
    check_out: Timestamp,
}

impl StayDates {
    pub fn new(check_in: Timestamp, check_out: Timestamp) -> Result<Self, ValidationError> {
        if !check_out.is_after(&check_in) {
            return Err(ValidationError::invalid_format(
                "check_out",
                "must be after check_in",
            ));
        }
        Ok(Self { check_in, check_out })
    }

    /// Calendar dates, each taken at midnight UTC.
    pub fn from_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(Timestamp::start_of(check_in), Timestamp::start_of(check_out))
    }

    pub fn check_in(&self) -> Timestamp {
        self.check_in
    }

    pub fn check_out(&self) -> Timestamp {
        self.check_out
    }

    /// Whole nights, rounding any partial day up, never fewer than one.
    pub fn nights(&self) -> i64 {
        let span = self.check_out.duration_since(&self.check_in);
        let whole = span.num_days();
        let nights = if span > Duration::days(whole) { whole + 1 } else { whole };
        nights.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_calendar_days_are_three_nights() {
        let stay = StayDates::from_dates(date(2024, 1, 1), date(2024, 1, 4)).unwrap();
        assert_eq!(stay.nights(), 3);
    }

    #[test]
    fn partial_day_rounds_up() {
        let check_in = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap());
        let check_out =
            Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 3, 11, 0, 0).unwrap());
        let stay = StayDates::new(check_in, check_out).unwrap();
        assert_eq!(stay.nights(), 2);
    }

    #[test]
    fn short_stay_counts_one_night() {
        let check_in = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        let check_out =
            Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap());
        assert_eq!(StayDates::new(check_in, check_out).unwrap().nights(), 1);
    }

    #[test]
    fn check_out_must_follow_check_in() {
        assert!(StayDates::from_dates(date(2024, 1, 4), date(2024, 1, 4)).is_err());
        assert!(StayDates::from_dates(date(2024, 1, 4), date(2024, 1, 1)).is_err());
    }

    proptest! {
        #[test]
        fn nights_is_ceiling_of_days_with_floor_of_one(minutes in 1i64..(60 * 24 * 60)) {
            let check_in = Timestamp::start_of(date(2024, 1, 1));
            let check_out = Timestamp::from_datetime(
                *check_in.as_datetime() + Duration::minutes(minutes),
            );
            let stay = StayDates::new(check_in, check_out).unwrap();
            let minutes_per_day = 24 * 60;
            let expected = ((minutes + minutes_per_day - 1) / minutes_per_day).max(1);
            prop_assert_eq!(stay.nights(), expected);
        }
    }
}
