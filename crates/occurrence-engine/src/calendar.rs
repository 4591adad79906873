//! Local-calendar helpers.
//!
//! The engine's local calendar is Central European time, represented by
//! `chrono_tz::Europe::Amsterdam`. Day boundaries, weekdays, time-of-day and
//! registration deadlines are all computed in this zone.

use chrono::offset::LocalResult;
use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;

/// The zone every local-calendar computation uses.
pub const LOCAL_TZ: Tz = chrono_tz::Europe::Amsterdam;

/// Calendar date of `instant` in local time.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&LOCAL_TZ).date_naive()
}

/// Wall-clock time of `instant` in local time.
pub fn local_time(instant: DateTime<Utc>) -> NaiveTime {
    instant.with_timezone(&LOCAL_TZ).time()
}

/// UTC offset in effect at `instant` in local time.
pub fn local_offset(instant: DateTime<Utc>) -> Duration {
    let seconds = instant.with_timezone(&LOCAL_TZ).offset().fix().local_minus_utc();
    Duration::seconds(i64::from(seconds))
}

/// Convert a local wall-clock time to UTC.
///
/// Ambiguous times (autumn fall-back) resolve to the earlier instant. Times
/// inside the spring-forward gap resolve one hour later.
pub fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match LOCAL_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => match LOCAL_TZ.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => naive.and_utc(),
        },
    }
}

/// Start of `date` in local time, as a UTC instant.
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN))
}

/// Weekday numbering used on the wire: 0 = Sunday .. 6 = Saturday.
pub fn weekday_from_number(n: i64) -> Option<Weekday> {
    match n {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_number(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// The most recent `first_day` on or before `date`.
///
/// With `Weekday::Sun` this is the start of the calendar week.
pub fn week_start(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_sunday() - first_day.num_days_from_sunday()) % 7;
    date - Duration::days(i64::from(back))
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map_or(31, |last| last.day())
}

/// Every date in `date`'s month that falls on `day`, in ascending order.
pub fn weekdays_in_month(date: NaiveDate, day: Weekday) -> Vec<NaiveDate> {
    let len = days_in_month(date);
    (1..=len)
        .filter_map(|d| date.with_day(d))
        .filter(|d| d.weekday() == day)
        .collect()
}
