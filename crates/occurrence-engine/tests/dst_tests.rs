//! Tests for the fixed CEST rule and its agreement with the local zone.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use occurrence_engine::calendar::{days_in_month, local_offset, week_start, weekdays_in_month};
use occurrence_engine::dst::{cest_bounds, cest_correction, is_cest};

#[test]
fn bounds_for_2026() {
    let (start, end) = cest_bounds(2026).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 10, 25, 1, 0, 0).unwrap());
}

#[test]
fn start_is_inclusive_and_end_exclusive() {
    let (start, end) = cest_bounds(2026).unwrap();
    assert!(is_cest(start));
    assert!(!is_cest(start - Duration::seconds(1)));
    assert!(is_cest(end - Duration::seconds(1)));
    assert!(!is_cest(end));
}

#[test]
fn correction_direction() {
    let winter = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let summer = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();

    assert_eq!(cest_correction(summer, winter), Duration::hours(1));
    assert_eq!(cest_correction(winter, summer), Duration::hours(-1));
    assert_eq!(cest_correction(winter, winter), Duration::zero());
    assert_eq!(cest_correction(summer, summer), Duration::zero());
}

#[test]
fn fixed_rule_agrees_with_local_zone() {
    // Every six hours from 2020 through 2030.
    let mut instant = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let stop = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
    while instant < stop {
        let expected = if is_cest(instant) { 2 } else { 1 };
        assert_eq!(local_offset(instant), Duration::hours(expected), "at {instant}");
        instant += Duration::hours(6);
    }
}

#[test]
fn calendar_helpers() {
    let wednesday = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
    assert_eq!(week_start(wednesday, Weekday::Sun), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    assert_eq!(week_start(wednesday, Weekday::Mon), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    assert_eq!(week_start(wednesday, Weekday::Wed), wednesday);

    assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()), 28);
    assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2028, 2, 10).unwrap()), 29);
    assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()), 31);

    let tuesdays = weekdays_in_month(wednesday, Weekday::Tue);
    let days: Vec<u32> = tuesdays.iter().map(|d| d.day()).collect();
    assert_eq!(days, vec![3, 10, 17, 24, 31]);
}
