//! Billing-cycle arithmetic.
//!
//! Cycles are calendar-month aligned: no rolling 30-day window and no
//! proration on signup date. The counter resets at UTC midnight on the 1st.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// UTC midnight on the 1st of the month containing `as_of`.
pub fn cycle_start(as_of: DateTime<Utc>) -> DateTime<Utc> {
    // Day 1 exists in every month, so the constructors cannot fail.
    let first = NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1)
        .expect("first day of month")
        .and_hms_opt(0, 0, 0)
        .expect("midnight");
    Utc.from_utc_datetime(&first)
}

/// Whether `created_at` falls inside the cycle containing `as_of`.
pub fn in_current_cycle(created_at: DateTime<Utc>, as_of: DateTime<Utc>) -> bool {
    created_at >= cycle_start(as_of) && created_at < as_of
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn test_cycle_start_mid_month() {
        assert_eq!(
            cycle_start(utc(2025, 3, 17, 14, 30, 5)),
            utc(2025, 3, 1, 0, 0, 0)
        );
    }

    #[test]
    fn test_cycle_start_is_fixed_point_on_the_first() {
        let first = utc(2025, 7, 1, 0, 0, 0);
        assert_eq!(cycle_start(first), first);
    }

    #[test]
    fn test_cycle_start_december_and_leap_february() {
        assert_eq!(
            cycle_start(utc(2024, 12, 31, 23, 59, 59)),
            utc(2024, 12, 1, 0, 0, 0)
        );
        assert_eq!(
            cycle_start(utc(2024, 2, 29, 12, 0, 0)),
            utc(2024, 2, 1, 0, 0, 0)
        );
    }

    #[test]
    fn test_prior_month_is_outside_current_cycle() {
        let as_of = utc(2025, 4, 2, 9, 0, 0);
        assert!(!in_current_cycle(utc(2025, 3, 31, 23, 59, 59), as_of));
        assert!(in_current_cycle(utc(2025, 4, 1, 0, 0, 0), as_of));
        assert!(in_current_cycle(utc(2025, 4, 2, 8, 59, 59), as_of));
        // The window is half-open on the right.
        assert!(!in_current_cycle(as_of, as_of));
    }
}
