//! Occurrence expansion -- turns one event definition and a time window into
//! the concrete dated occurrences that intersect it.
//!
//! One-off definitions pass through if they overlap the window. Recurring
//! definitions are expanded by scanning local calendar days and testing each
//! against the rule. The definition's local time of day is kept stable across
//! daylight-saving transitions (see [`crate::dst`]).

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use tracing::{trace, warn};

use crate::calendar::{
    days_in_month, local_date, local_midnight, local_offset, local_time, week_start,
    weekdays_in_month,
};
use crate::dst::cest_correction;
use crate::model::{EventDefinition, Occurrence};
use crate::recurrence::{MonthlyPattern, RecurrenceRule, WeekOfMonth};

/// Upper bound on the number of days scanned for one recurring definition.
///
/// The scan starts a week before the window's week, so nine weeks leave room
/// for biweekly and monthly rules near the window edges with windows of up to
/// about seven weeks. This margin was chosen for the existing rule kinds and
/// is not a proven bound for new ones.
pub const MAX_SCAN_DAYS: i64 = 63;

/// Longest window, in days, that the scan covers completely.
///
/// The scan may begin up to 13 days before the window's local start date
/// (six days back to Sunday, then one more week). One further day absorbs a
/// spring-forward hour at the far end.
pub const MAX_WINDOW_DAYS: i64 = MAX_SCAN_DAYS - 15;

/// Expand `definition` into every occurrence overlapping
/// `[window_start, window_end)`.
///
/// Output is ordered by start and contains no two occurrences with the same
/// start. The function is pure: identical inputs give identical output.
pub fn generate_occurrences(
    definition: &EventDefinition,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Occurrence> {
    let rule = &definition.recurrence;
    if !rule.is_recurring() {
        return single_occurrence(definition, window_start, window_end);
    }
    if rule.is_empty() {
        warn!(definition = %definition.id, ?rule, "recurrence rule has no days configured");
        return Vec::new();
    }

    let occurrences = expand_recurring(definition, window_start, window_end);
    trace!(
        definition = %definition.id,
        count = occurrences.len(),
        "expanded recurring definition"
    );
    occurrences
}

fn single_occurrence(
    definition: &EventDefinition,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Occurrence> {
    let occurrence = Occurrence::from_definition(
        definition,
        occurrence_id(&definition.id, local_date(definition.start)),
        definition.start,
        definition.end,
        definition.registration_deadline,
    );
    if occurrence.overlaps(window_start, window_end) {
        vec![occurrence]
    } else {
        Vec::new()
    }
}

fn expand_recurring(
    definition: &EventDefinition,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Occurrence> {
    let anchor = local_date(definition.start);
    let base_time = local_time(definition.start);
    let base_offset = local_offset(definition.start);
    let duration = definition.duration();

    let scan_from =
        week_start(local_date(window_start), Weekday::Sun).max(anchor) - Duration::days(7);

    let mut occurrences: Vec<Occurrence> = Vec::new();
    for step in 0..MAX_SCAN_DAYS {
        let day = scan_from + Duration::days(step);
        if local_midnight(day) > window_end {
            break;
        }
        if day < anchor || !day_matches(&definition.recurrence, day, anchor) {
            continue;
        }

        let start = synthesize_start(definition.start, base_time, base_offset, day);
        if occurrences.iter().any(|o| o.start == start) {
            continue;
        }

        let deadline = definition.deadline_rule.map(|rule| rule.resolve(start));
        let occurrence = Occurrence::from_definition(
            definition,
            occurrence_id(&definition.id, day),
            start,
            start + duration,
            deadline,
        );
        if occurrence.overlaps(window_start, window_end) {
            occurrences.push(occurrence);
        }
    }
    occurrences
}

/// Whether `rule` places an occurrence on local date `day`.
fn day_matches(rule: &RecurrenceRule, day: NaiveDate, anchor: NaiveDate) -> bool {
    match rule {
        RecurrenceRule::None | RecurrenceRule::Unconfigured(_) => false,
        RecurrenceRule::Weekly { days } => days.contains(day.weekday()),
        RecurrenceRule::Biweekly { day: weekday } => {
            day.weekday() == *weekday && is_even_week(day, anchor, *weekday)
        }
        RecurrenceRule::Monthly(MonthlyPattern::DayOfMonth(dom)) => {
            day.day() == (*dom).min(days_in_month(day))
        }
        RecurrenceRule::Monthly(MonthlyPattern::WeeksOfMonth { weeks, day: weekday }) => {
            day.weekday() == *weekday && is_listed_week_of_month(day, *weekday, weeks)
        }
    }
}

/// Even number of whole weeks between the anchor's week and `day`'s week,
/// with weeks starting on `weekday`.
fn is_even_week(day: NaiveDate, anchor: NaiveDate, weekday: Weekday) -> bool {
    let days = (week_start(day, weekday) - week_start(anchor, weekday)).num_days();
    (days / 7).rem_euclid(2) == 0
}

fn is_listed_week_of_month(day: NaiveDate, weekday: Weekday, weeks: &[WeekOfMonth]) -> bool {
    let matching = weekdays_in_month(day, weekday);
    weeks.iter().any(|week| match week.index() {
        Some(i) => matching.get(i) == Some(&day),
        None => matching.last() == Some(&day),
    })
}

/// Start instant for `day` at the definition's local time of day.
///
/// The wall-clock time is converted with the base instant's offset, then the
/// fixed CEST rule corrects for a transition between the base and `day`.
fn synthesize_start(
    base: DateTime<Utc>,
    base_time: NaiveTime,
    base_offset: Duration,
    day: NaiveDate,
) -> DateTime<Utc> {
    let uncorrected = (day.and_time(base_time) - base_offset).and_utc();
    uncorrected + cest_correction(base, uncorrected)
}

fn occurrence_id(definition_id: &str, day: NaiveDate) -> String {
    format!("{}-{}", definition_id, day.format("%Y-%m-%d"))
}
