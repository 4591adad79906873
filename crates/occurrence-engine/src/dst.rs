//! The fixed Central European Summer Time rule.
//!
//! CEST runs from the last Sunday of March at 01:00 UTC (inclusive) to the
//! last Sunday of October at 01:00 UTC (exclusive). The expander uses this
//! rule to keep an occurrence's wall-clock time equal to its anchor's when
//! the two fall on opposite sides of a transition.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Last Sunday of the given month, or `None` outside chrono's date range.
fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = first_of_next.pred_opt()?;
    let back = last.weekday().num_days_from_sunday();
    Some(last - Duration::days(i64::from(back)))
}

/// The `[start, end)` CEST interval for `year`.
pub fn cest_bounds(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = last_sunday(year, 3)?.and_hms_opt(1, 0, 0)?.and_utc();
    let end = last_sunday(year, 10)?.and_hms_opt(1, 0, 0)?.and_utc();
    Some((start, end))
}

/// Whether `instant` falls inside the summer-time interval of its year.
pub fn is_cest(instant: DateTime<Utc>) -> bool {
    cest_bounds(instant.year()).is_some_and(|(start, end)| instant >= start && instant < end)
}

/// One-hour correction applied to a candidate instant synthesized from a
/// base instant's UTC offset.
///
/// - base in summer time, candidate not: `+1h`
/// - base in standard time, candidate in summer time: `-1h`
/// - same side: zero
pub fn cest_correction(base: DateTime<Utc>, candidate: DateTime<Utc>) -> Duration {
    match (is_cest(base), is_cest(candidate)) {
        (true, false) => Duration::hours(1),
        (false, true) => Duration::hours(-1),
        _ => Duration::zero(),
    }
}
