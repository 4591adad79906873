//! Recurrence rules and their ingestion-time normalization.
//!
//! On the wire a rule is a loose record (`type`, `daysOfWeek`, `dayOfWeek`,
//! `dayOfMonth`, `weeksOfMonth`) that several generations of catalog data
//! have filled in differently. [`RecurrenceRule`] is the canonical form: the
//! raw record is normalized once during deserialization so the expander only
//! ever matches on one shape per frequency.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::{weekday_from_number, weekday_number};

/// Recurrence frequency, as named by the wire `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    None,
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    fn from_wire(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Some(Frequency::None),
            "WEEKLY" => Some(Frequency::Weekly),
            "BIWEEKLY" => Some(Frequency::Biweekly),
            "MONTHLY" => Some(Frequency::Monthly),
            _ => None,
        }
    }

    fn as_wire(self) -> &'static str {
        match self {
            Frequency::None => "NONE",
            Frequency::Weekly => "WEEKLY",
            Frequency::Biweekly => "BIWEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }
}

/// Which occurrence of a weekday within its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIRST" => Some(WeekOfMonth::First),
            "SECOND" => Some(WeekOfMonth::Second),
            "THIRD" => Some(WeekOfMonth::Third),
            "FOURTH" => Some(WeekOfMonth::Fourth),
            "LAST" => Some(WeekOfMonth::Last),
            _ => None,
        }
    }

    fn as_wire(self) -> &'static str {
        match self {
            WeekOfMonth::First => "FIRST",
            WeekOfMonth::Second => "SECOND",
            WeekOfMonth::Third => "THIRD",
            WeekOfMonth::Fourth => "FOURTH",
            WeekOfMonth::Last => "LAST",
        }
    }

    /// Zero-based index into a month's list of matching weekdays, or `None`
    /// for [`WeekOfMonth::Last`].
    pub fn index(self) -> Option<usize> {
        match self {
            WeekOfMonth::First => Some(0),
            WeekOfMonth::Second => Some(1),
            WeekOfMonth::Third => Some(2),
            WeekOfMonth::Fourth => Some(3),
            WeekOfMonth::Last => None,
        }
    }
}

/// A set of weekdays, stored as a bitmask indexed from Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_sunday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in wire order, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        (0..7)
            .filter_map(weekday_from_number)
            .filter(|d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// The two mutually exclusive monthly shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyPattern {
    /// A fixed calendar day, clamped to the month's length.
    DayOfMonth(u32),
    /// The listed occurrences of `day` within each month.
    WeeksOfMonth { weeks: Vec<WeekOfMonth>, day: Weekday },
}

/// Canonical recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawRecurrence", into = "RawRecurrence")]
pub enum RecurrenceRule {
    #[default]
    None,
    Weekly { days: WeekdaySet },
    /// Every second week on `day`, aligned to the anchor date's week.
    Biweekly { day: Weekday },
    Monthly(MonthlyPattern),
    /// A recurring frequency with no usable day configuration. Expands to
    /// nothing.
    Unconfigured(Frequency),
}

impl RecurrenceRule {
    pub fn frequency(&self) -> Frequency {
        match self {
            RecurrenceRule::None => Frequency::None,
            RecurrenceRule::Weekly { .. } => Frequency::Weekly,
            RecurrenceRule::Biweekly { .. } => Frequency::Biweekly,
            RecurrenceRule::Monthly(_) => Frequency::Monthly,
            RecurrenceRule::Unconfigured(freq) => *freq,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency() != Frequency::None
    }

    /// True for rules that can never match a day.
    pub fn is_empty(&self) -> bool {
        match self {
            RecurrenceRule::Weekly { days } => days.is_empty(),
            RecurrenceRule::Monthly(MonthlyPattern::WeeksOfMonth { weeks, .. }) => weeks.is_empty(),
            RecurrenceRule::Unconfigured(_) => true,
            _ => false,
        }
    }
}

/// Wire shape of a recurrence rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecurrence {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days_of_week: Option<Vec<i64>>,
    /// Legacy single-day weekly shape, and the day of biweekly and
    /// week-of-month rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_week: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weeks_of_month: Option<Vec<String>>,
}

impl From<RawRecurrence> for RecurrenceRule {
    fn from(raw: RawRecurrence) -> Self {
        let Some(freq) = Frequency::from_wire(&raw.kind) else {
            warn!(kind = %raw.kind, "unknown recurrence type, treating as non-recurring");
            return RecurrenceRule::None;
        };

        let single_day = raw.day_of_week.and_then(weekday_from_number);

        match freq {
            Frequency::None => RecurrenceRule::None,
            Frequency::Weekly => {
                let days: WeekdaySet = match &raw.days_of_week {
                    Some(list) if !list.is_empty() => list
                        .iter()
                        .filter_map(|n| weekday_from_number(*n))
                        .collect(),
                    _ => single_day.into_iter().collect(),
                };
                RecurrenceRule::Weekly { days }
            }
            Frequency::Biweekly => {
                let day = single_day.or_else(|| {
                    raw.days_of_week
                        .as_ref()
                        .and_then(|list| list.iter().find_map(|n| weekday_from_number(*n)))
                });
                match day {
                    Some(day) => RecurrenceRule::Biweekly { day },
                    None => RecurrenceRule::Unconfigured(Frequency::Biweekly),
                }
            }
            Frequency::Monthly => {
                let mut weeks: Vec<WeekOfMonth> = raw
                    .weeks_of_month
                    .iter()
                    .flatten()
                    .filter_map(|w| WeekOfMonth::from_wire(w))
                    .collect();
                weeks.sort();
                weeks.dedup();

                match (weeks.is_empty(), single_day, raw.day_of_month) {
                    (false, Some(day), _) => {
                        RecurrenceRule::Monthly(MonthlyPattern::WeeksOfMonth { weeks, day })
                    }
                    (_, _, Some(dom)) if (1..=31).contains(&dom) => {
                        RecurrenceRule::Monthly(MonthlyPattern::DayOfMonth(dom as u32))
                    }
                    _ => RecurrenceRule::Unconfigured(Frequency::Monthly),
                }
            }
        }
    }
}

impl From<RecurrenceRule> for RawRecurrence {
    fn from(rule: RecurrenceRule) -> Self {
        let mut raw = RawRecurrence {
            kind: rule.frequency().as_wire().to_string(),
            ..RawRecurrence::default()
        };
        match rule {
            RecurrenceRule::None | RecurrenceRule::Unconfigured(_) => {}
            RecurrenceRule::Weekly { days } => {
                raw.days_of_week =
                    Some(days.iter().map(|d| i64::from(weekday_number(d))).collect());
            }
            RecurrenceRule::Biweekly { day } => {
                raw.day_of_week = Some(i64::from(weekday_number(day)));
            }
            RecurrenceRule::Monthly(MonthlyPattern::DayOfMonth(dom)) => {
                raw.day_of_month = Some(i64::from(dom));
            }
            RecurrenceRule::Monthly(MonthlyPattern::WeeksOfMonth { weeks, day }) => {
                raw.day_of_week = Some(i64::from(weekday_number(day)));
                raw.weeks_of_month = Some(weeks.iter().map(|w| w.as_wire().to_string()).collect());
            }
        }
        raw
    }
}
