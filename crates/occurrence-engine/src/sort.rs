//! Venue orderings: by distance, by next relevant time, alphabetically.
//!
//! Every ordering is a stable sort, so venues with equal keys keep their
//! first-seen order.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use icu::collator::options::{CollatorOptions, Strength};
use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::locale;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::select::{AnnotatedOccurrence, VenueWithDistance};

/// Dutch collation at secondary strength: case is ignored, accents only
/// break ties between otherwise equal names.
static VENUE_COLLATOR: LazyLock<CollatorBorrowed<'static>> = LazyLock::new(|| {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Secondary);
    Collator::try_new(locale!("nl").into(), options).expect("compiled collation data covers nl")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Distance,
    Time,
    Alphabetical,
}

impl FromStr for SortBy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortBy::Distance),
            "time" => Ok(SortBy::Time),
            "alphabetical" => Ok(SortBy::Alphabetical),
            _ => Err(EngineError::UnknownOption {
                kind: "sort order",
                value: s.to_string(),
                expected: "distance, time, alphabetical",
            }),
        }
    }
}

/// A venue's position relative to "now" when sorting by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// At least one occurrence is running.
    Active,
    /// Nothing running, but something starts later.
    Upcoming,
    /// Everything has ended, or nothing survived filtering.
    Past,
}

/// Tier of a venue's occurrences and the time key used within that tier:
/// the soonest active end for `Active`, the soonest upcoming start for
/// `Upcoming`, and `None` (infinitely late) for `Past`.
pub fn classify(
    occurrences: &[AnnotatedOccurrence],
    now: DateTime<Utc>,
) -> (Tier, Option<DateTime<Utc>>) {
    let soonest_active_end = occurrences
        .iter()
        .map(|o| &o.occurrence)
        .filter(|o| o.is_active(now))
        .map(|o| o.end)
        .min();
    if let Some(end) = soonest_active_end {
        return (Tier::Active, Some(end));
    }

    let soonest_upcoming_start = occurrences
        .iter()
        .map(|o| o.occurrence.start)
        .filter(|start| *start > now)
        .min();
    match soonest_upcoming_start {
        Some(start) => (Tier::Upcoming, Some(start)),
        None => (Tier::Past, None),
    }
}

/// Sort `venues` in place.
pub fn sort_venues(
    venues: &mut [VenueWithDistance],
    occurrences_by_venue: &BTreeMap<String, Vec<AnnotatedOccurrence>>,
    sort_by: SortBy,
    now: DateTime<Utc>,
) {
    match sort_by {
        SortBy::Distance => {
            venues.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        }
        SortBy::Alphabetical => {
            venues.sort_by(|a, b| {
                VENUE_COLLATOR
                    .compare(a.venue.name.trim(), b.venue.name.trim())
                    .then_with(|| a.venue.name.cmp(&b.venue.name))
            });
        }
        SortBy::Time => {
            venues.sort_by_cached_key(|v| {
                let occurrences = occurrences_by_venue
                    .get(&v.venue.id)
                    .map_or(&[][..], Vec::as_slice);
                let (tier, key) = classify(occurrences, now);
                (tier, key.unwrap_or(DateTime::<Utc>::MAX_UTC), TotalF64(v.distance_km))
            });
        }
    }
}

/// `f64` ordered by `total_cmp`, for use in sort keys.
#[derive(Debug, Clone, Copy)]
struct TotalF64(f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
