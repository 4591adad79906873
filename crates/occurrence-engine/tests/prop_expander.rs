//! Property-based tests for occurrence expansion using proptest.
//!
//! These check invariants that should hold for *any* definition and window,
//! not just the specific examples in `expander_tests.rs`.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use occurrence_engine::calendar::{local_date, local_time, weekday_from_number, LOCAL_TZ};
use occurrence_engine::{
    generate_occurrences, AccessLevel, EventDefinition, RecurrenceRule, Venue,
    VerificationStatus, WeekdaySet,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A local start instant in 2025-2027, between 07:00 and 21:59 so it never
/// lands in a DST gap.
fn arb_local_start() -> impl Strategy<Value = DateTime<Utc>> {
    (2025i32..=2027, 1u32..=12, 1u32..=28, 7u32..=21, 0u32..=59).prop_map(|(y, m, d, h, min)| {
        LOCAL_TZ
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    })
}

fn arb_duration_minutes() -> impl Strategy<Value = i64> {
    15i64..=240
}

fn arb_day_set() -> impl Strategy<Value = WeekdaySet> {
    prop::collection::vec(0i64..=6, 1..=7)
        .prop_map(|days| days.into_iter().filter_map(weekday_from_number).collect())
}

fn arb_weekday() -> impl Strategy<Value = Weekday> {
    (0i64..=6).prop_map(|n| weekday_from_number(n).unwrap())
}

fn definition(start: DateTime<Utc>, minutes: i64, recurrence: RecurrenceRule) -> EventDefinition {
    EventDefinition {
        id: "prop".to_string(),
        venue: Venue {
            id: "v".to_string(),
            name: "Venue".to_string(),
            address: String::new(),
            latitude: 52.37,
            longitude: 4.89,
        },
        title: "Event".to_string(),
        description: String::new(),
        start,
        end: start + Duration::minutes(minutes),
        food_type: "MEAL".to_string(),
        dietary_tags: BTreeSet::new(),
        access_level: AccessLevel::WalkIn,
        cost: String::new(),
        recurrence,
        deadline_rule: None,
        registration_deadline: None,
        status: VerificationStatus::Verified,
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: one-off definitions follow the strict overlap law
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn one_off_overlap_law(
        start in arb_local_start(),
        dur in arb_duration_minutes(),
        window_offset in -600i64..=600,
        window_len in 0i64..=600,
    ) {
        let defn = definition(start, dur, RecurrenceRule::None);
        let window_start = start + Duration::minutes(window_offset);
        let window_end = window_start + Duration::minutes(window_len);

        let expected = usize::from(defn.start < window_end && defn.end > window_start);
        let result = generate_occurrences(&defn, window_start, window_end);

        prop_assert_eq!(result.len(), expected);
    }
}

// ---------------------------------------------------------------------------
// Property 2: expansion is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_idempotent(
        anchor in arb_local_start(),
        dur in arb_duration_minutes(),
        days in arb_day_set(),
        window_start in arb_local_start(),
        window_days in 1i64..=14,
    ) {
        let defn = definition(anchor, dur, RecurrenceRule::Weekly { days });
        let window_end = window_start + Duration::days(window_days);

        let first = generate_occurrences(&defn, window_start, window_end);
        let second = generate_occurrences(&defn, window_start, window_end);

        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 3: output is sorted, unique, inside the window, on allowed days
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn weekly_output_is_well_formed(
        anchor in arb_local_start(),
        dur in arb_duration_minutes(),
        days in arb_day_set(),
        window_start in arb_local_start(),
        window_days in 1i64..=14,
    ) {
        let defn = definition(anchor, dur, RecurrenceRule::Weekly { days });
        let window_end = window_start + Duration::days(window_days);

        let result = generate_occurrences(&defn, window_start, window_end);

        for pair in result.windows(2) {
            prop_assert!(pair[0].start < pair[1].start, "not strictly sorted");
        }
        for occurrence in &result {
            prop_assert!(occurrence.start < window_end && occurrence.end > window_start);
            prop_assert!(days.contains(local_date(occurrence.start).weekday()));
            prop_assert!(local_date(occurrence.start) >= local_date(anchor));
            prop_assert_eq!(occurrence.end - occurrence.start, Duration::minutes(dur));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: every weekday in the set appears once per full week
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn weekly_count_matches_day_set(
        days in arb_day_set(),
        weeks in 1i64..=4,
    ) {
        // Anchor well before the window; window starts at a local midnight.
        let anchor = LOCAL_TZ
            .with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let window_start = LOCAL_TZ
            .with_ymd_and_hms(2026, 5, 4, 0, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let window_end = window_start + Duration::days(7 * weeks);
        let defn = definition(anchor, 60, RecurrenceRule::Weekly { days });

        let result = generate_occurrences(&defn, window_start, window_end);

        prop_assert_eq!(result.len(), days.len() * weeks as usize);
    }
}

// ---------------------------------------------------------------------------
// Property 5: wall-clock time survives DST transitions
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn wall_clock_time_is_preserved(
        anchor in arb_local_start(),
        days in arb_day_set(),
        window_start in arb_local_start(),
    ) {
        let defn = definition(anchor, 90, RecurrenceRule::Weekly { days });
        let window_end = window_start + Duration::days(14);

        for occurrence in generate_occurrences(&defn, window_start, window_end) {
            prop_assert_eq!(local_time(occurrence.start), local_time(anchor));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: biweekly occurrences are exactly fourteen days apart
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn biweekly_spacing_is_two_weeks(
        anchor in arb_local_start(),
        day in arb_weekday(),
        window_start in arb_local_start(),
    ) {
        let defn = definition(anchor, 60, RecurrenceRule::Biweekly { day });
        let window_end = window_start + Duration::days(42);

        let result = generate_occurrences(&defn, window_start, window_end);

        for occurrence in &result {
            prop_assert_eq!(local_date(occurrence.start).weekday(), day);
        }
        for pair in result.windows(2) {
            let gap = local_date(pair[1].start) - local_date(pair[0].start);
            prop_assert_eq!(gap, Duration::days(14));
        }
    }
}
