//! Tests for catalog ingestion: JSON shapes, recurrence normalization and
//! definition validation.

use chrono::{NaiveTime, Weekday};
use occurrence_engine::{
    parse_catalog, AccessLevel, EngineError, Frequency, MonthlyPattern, RecurrenceRule,
    VerificationStatus, WeekOfMonth,
};

/// Helper: a single-definition catalog with the given `recurrence` JSON.
fn catalog_with(recurrence: &str) -> String {
    format!(
        r#"[{{
            "id": "def-1",
            "venue": {{
                "id": "venue-1",
                "name": "Buurtkeuken",
                "address": "Javastraat 10",
                "latitude": 52.363,
                "longitude": 4.938
            }},
            "title": "Soep op dinsdag",
            "start": "2026-03-03T16:00:00Z",
            "end": "2026-03-03T18:00:00Z",
            "foodType": "MEAL",
            "dietaryTags": ["VEGETARIAN"],
            "accessLevel": "WALK_IN",
            "cost": "Gratis",
            "recurrence": {recurrence},
            "status": "VERIFIED"
        }}]"#
    )
}

fn rule(recurrence: &str) -> RecurrenceRule {
    parse_catalog(&catalog_with(recurrence))
        .expect("catalog should parse")
        .remove(0)
        .recurrence
}

#[test]
fn full_definition_parses() {
    let defs = parse_catalog(&catalog_with("null")).unwrap();

    assert_eq!(defs.len(), 1);
    let def = &defs[0];
    assert_eq!(def.id, "def-1");
    assert_eq!(def.venue.name, "Buurtkeuken");
    assert_eq!(def.access_level, AccessLevel::WalkIn);
    assert_eq!(def.status, VerificationStatus::Verified);
    assert!(def.dietary_tags.contains("VEGETARIAN"));
    assert_eq!(def.recurrence, RecurrenceRule::None);
    assert!(def.deadline_rule.is_none());
}

#[test]
fn missing_optional_fields_take_defaults() {
    let json = r#"[{
        "id": "bare",
        "venue": {"id": "v", "name": "V", "latitude": 52.0, "longitude": 4.0},
        "title": "Bare",
        "start": "2026-03-03T16:00:00Z",
        "end": "2026-03-03T17:00:00Z",
        "foodType": "PARCEL",
        "accessLevel": "REFERRAL"
    }]"#;

    let def = parse_catalog(json).unwrap().remove(0);

    assert_eq!(def.recurrence, RecurrenceRule::None);
    assert_eq!(def.status, VerificationStatus::NeedsVerification);
    assert_eq!(def.cost, "");
    assert!(def.dietary_tags.is_empty());
}

#[test]
fn weekly_day_set() {
    let parsed = rule(r#"{"type": "WEEKLY", "daysOfWeek": [1, 3]}"#);
    let RecurrenceRule::Weekly { days } = &parsed else {
        panic!("expected weekly, got {parsed:?}");
    };
    assert_eq!(days.iter().collect::<Vec<_>>(), vec![Weekday::Mon, Weekday::Wed]);
}

#[test]
fn legacy_single_day_weekly_becomes_a_one_element_set() {
    let parsed = rule(r#"{"type": "WEEKLY", "dayOfWeek": 2}"#);
    assert_eq!(
        parsed,
        RecurrenceRule::Weekly {
            days: [Weekday::Tue].into_iter().collect()
        }
    );
}

#[test]
fn weekly_without_days_is_empty_not_an_error() {
    let parsed = rule(r#"{"type": "WEEKLY"}"#);
    assert!(parsed.is_empty());
    assert_eq!(parsed.frequency(), Frequency::Weekly);
}

#[test]
fn out_of_range_weekdays_are_dropped() {
    let parsed = rule(r#"{"type": "WEEKLY", "daysOfWeek": [0, 7, -1]}"#);
    assert_eq!(
        parsed,
        RecurrenceRule::Weekly {
            days: [Weekday::Sun].into_iter().collect()
        }
    );
}

#[test]
fn biweekly_shapes() {
    assert_eq!(
        rule(r#"{"type": "BIWEEKLY", "dayOfWeek": 4}"#),
        RecurrenceRule::Biweekly { day: Weekday::Thu }
    );
    assert_eq!(
        rule(r#"{"type": "BIWEEKLY"}"#),
        RecurrenceRule::Unconfigured(Frequency::Biweekly)
    );
}

#[test]
fn monthly_shapes() {
    assert_eq!(
        rule(r#"{"type": "MONTHLY", "dayOfMonth": 15}"#),
        RecurrenceRule::Monthly(MonthlyPattern::DayOfMonth(15))
    );
    assert_eq!(
        rule(r#"{"type": "MONTHLY", "weeksOfMonth": ["LAST", "FIRST"], "dayOfWeek": 2}"#),
        RecurrenceRule::Monthly(MonthlyPattern::WeeksOfMonth {
            weeks: vec![WeekOfMonth::First, WeekOfMonth::Last],
            day: Weekday::Tue,
        })
    );
    assert_eq!(
        rule(r#"{"type": "MONTHLY", "dayOfMonth": 40}"#),
        RecurrenceRule::Unconfigured(Frequency::Monthly)
    );
}

#[test]
fn unknown_recurrence_type_is_treated_as_one_off() {
    assert_eq!(rule(r#"{"type": "YEARLY"}"#), RecurrenceRule::None);
}

#[test]
fn recurrence_serializes_in_canonical_shape() {
    let parsed = rule(r#"{"type": "WEEKLY", "dayOfWeek": 5}"#);
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json, serde_json::json!({"type": "WEEKLY", "daysOfWeek": [5]}));
}

#[test]
fn deadline_rule_parses_hh_mm() {
    let json = catalog_with("null").replace(
        r#""status": "VERIFIED""#,
        r#""status": "VERIFIED", "deadlineRule": {"daysBefore": 2, "time": "12:30"}"#,
    );

    let def = parse_catalog(&json).unwrap().remove(0);
    let rule = def.deadline_rule.unwrap();

    assert_eq!(rule.days_before, 2);
    assert_eq!(rule.time, NaiveTime::from_hms_opt(12, 30, 0).unwrap());
}

#[test]
fn bad_deadline_time_is_a_catalog_error() {
    let json = catalog_with("null").replace(
        r#""status": "VERIFIED""#,
        r#""status": "VERIFIED", "deadlineRule": {"daysBefore": 2, "time": "half one"}"#,
    );

    assert!(matches!(parse_catalog(&json), Err(EngineError::Catalog(_))));
}

#[test]
fn end_before_start_is_rejected() {
    let json = catalog_with("null").replace("2026-03-03T18:00:00Z", "2026-03-03T16:00:00Z");

    let err = parse_catalog(&json).unwrap_err();
    assert!(matches!(err, EngineError::InvalidDefinition { ref id, .. } if id == "def-1"));
}

#[test]
fn malformed_json_is_a_catalog_error() {
    assert!(matches!(parse_catalog("{not json"), Err(EngineError::Catalog(_))));
}
