//! Human-readable (Dutch) descriptions of recurrence and deadline rules, as
//! shown next to an event on the timeline.

use chrono::Weekday;

use crate::deadline::RegistrationDeadlineRule;
use crate::recurrence::{Frequency, MonthlyPattern, RecurrenceRule, WeekOfMonth};

/// Describe a recurrence rule, e.g. "Elke maandag en woensdag".
pub fn describe_recurrence(rule: &RecurrenceRule) -> String {
    match rule {
        RecurrenceRule::None => "Eenmalig".to_string(),
        RecurrenceRule::Weekly { days } if days.is_empty() => "Wekelijks".to_string(),
        RecurrenceRule::Weekly { days } if days.len() == 7 => "Elke dag".to_string(),
        RecurrenceRule::Weekly { days } => {
            let mut names: Vec<Weekday> = days.iter().collect();
            names.sort_by_key(|d| d.num_days_from_monday());
            format!("Elke {}", join_dutch(names.into_iter().map(day_name)))
        }
        RecurrenceRule::Biweekly { day } => format!("Om de week op {}", day_name(*day)),
        RecurrenceRule::Monthly(MonthlyPattern::DayOfMonth(dom)) => {
            format!("Maandelijks op de {dom}e")
        }
        RecurrenceRule::Monthly(MonthlyPattern::WeeksOfMonth { weeks, day }) => format!(
            "Elke {} {} van de maand",
            join_dutch(weeks.iter().map(|w| ordinal(*w))),
            day_name(*day)
        ),
        RecurrenceRule::Unconfigured(freq) => match freq {
            Frequency::None => "Eenmalig",
            Frequency::Weekly => "Wekelijks",
            Frequency::Biweekly => "Om de week",
            Frequency::Monthly => "Maandelijks",
        }
        .to_string(),
    }
}

/// Describe a deadline rule, e.g. "Aanmelden tot 12:00, 2 dagen van tevoren".
pub fn describe_deadline(rule: &RegistrationDeadlineRule) -> String {
    let time = rule.time.format("%H:%M");
    match rule.days_before {
        0 => format!("Aanmelden tot {time} op de dag zelf"),
        1 => format!("Aanmelden tot {time} de dag ervoor"),
        n => format!("Aanmelden tot {time}, {n} dagen van tevoren"),
    }
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "maandag",
        Weekday::Tue => "dinsdag",
        Weekday::Wed => "woensdag",
        Weekday::Thu => "donderdag",
        Weekday::Fri => "vrijdag",
        Weekday::Sat => "zaterdag",
        Weekday::Sun => "zondag",
    }
}

fn ordinal(week: WeekOfMonth) -> &'static str {
    match week {
        WeekOfMonth::First => "eerste",
        WeekOfMonth::Second => "tweede",
        WeekOfMonth::Third => "derde",
        WeekOfMonth::Fourth => "vierde",
        WeekOfMonth::Last => "laatste",
    }
}

/// "a", "a en b", "a, b en c".
fn join_dutch<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<&str> = items.collect();
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} en {}", rest.join(", "), last),
    }
}
