//! Feature (paid promotion) windows.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Longest single feature period, in days.
pub const MAX_FEATURE_DAYS: u32 = 365;

/// Interval during which a property is promoted.
///
/// # Invariants
///
/// - `end > start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureWindow {
    start: Timestamp,
    end: Timestamp,
}

impl FeatureWindow {
    /// Window `[now, now + days]`.
    pub fn starting_at(now: Timestamp, days: u32) -> Result<Self, ValidationError> {
        check_days(days)?;
        Ok(Self {
            start: now,
            end: now.add_days(i64::from(days)),
        })
    }

    /// Rebuilds a stored window, enforcing `end > start`.
    pub fn from_bounds(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if !end.is_after(&start) {
            return Err(ValidationError::invalid_format(
                "feature_end_date",
                "must be after feature_start_date",
            ));
        }
        Ok(Self { start, end })
    }

    /// Same start, end pushed out from the current end (not from now).
    pub fn extended_by(&self, days: u32) -> Result<Self, ValidationError> {
        check_days(days)?;
        Ok(Self {
            start: self.start,
            end: self.end.add_days(i64::from(days)),
        })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether the promotion is running at `now`.
    pub fn covers(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.start) && now.is_before(&self.end)
    }
}

fn check_days(days: u32) -> Result<(), ValidationError> {
    if days == 0 || days > MAX_FEATURE_DAYS {
        return Err(ValidationError::out_of_range(
            "duration_days",
            1,
            i64::from(MAX_FEATURE_DAYS),
            i64::from(days),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn at(day: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap())
    }

    #[test]
    fn starting_at_spans_requested_days() {
        let window = FeatureWindow::starting_at(at(1), 7).unwrap();
        assert_eq!(window.start(), at(1));
        assert_eq!(window.end(), at(8));
    }

    #[test]
    fn zero_days_is_rejected() {
        assert!(FeatureWindow::starting_at(at(1), 0).is_err());
    }

    #[test]
    fn extension_counts_from_current_end() {
        let window = FeatureWindow::starting_at(at(1), 7).unwrap();
        let extended = window.extended_by(14).unwrap();
        assert_eq!(extended.start(), at(1));
        assert_eq!(extended.end(), at(22));
    }

    #[test]
    fn from_bounds_requires_end_after_start() {
        assert!(FeatureWindow::from_bounds(at(5), at(5)).is_err());
        assert!(FeatureWindow::from_bounds(at(5), at(4)).is_err());
        assert!(FeatureWindow::from_bounds(at(4), at(5)).is_ok());
    }

    #[test]
    fn covers_is_half_open() {
        let window = FeatureWindow::starting_at(at(1), 2).unwrap();
        assert!(window.covers(&at(1)));
        assert!(window.covers(&at(2)));
        assert!(!window.covers(&at(3)));
    }

    proptest! {
        #[test]
        fn window_end_is_start_plus_days(offset in 0i64..10_000, days in 1u32..=MAX_FEATURE_DAYS) {
            let now = at(1).add_days(offset);
            let window = FeatureWindow::starting_at(now, days).unwrap();
            prop_assert_eq!(window.start(), now);
            prop_assert_eq!(window.end(), now.add_days(i64::from(days)));
            prop_assert!(window.end().is_after(&window.start()));
        }

        #[test]
        fn extension_ignores_current_time(first in 1u32..=100, extra in 1u32..=100) {
            let window = FeatureWindow::starting_at(at(1), first).unwrap();
            let extended = window.extended_by(extra).unwrap();
            prop_assert_eq!(extended.end(), window.end().add_days(i64::from(extra)));
            prop_assert_eq!(extended.start(), window.start());
        }
    }
}
