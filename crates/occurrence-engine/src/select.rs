//! The selection pipeline: window, expansion, annotation, filtering,
//! grouping by venue, and sorting.
//!
//! `select` is a pure function of its inputs and the single `now` it is
//! handed. Every time-relative decision in one call (the window, tiers,
//! deadline checks) uses that same instant.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{local_date, local_midnight};
use crate::cost::{parse_cost, CostValue};
use crate::error::EngineError;
use crate::expander::generate_occurrences;
use crate::filter::FilterCriteria;
use crate::geo::distance_km;
use crate::model::{Coordinate, EventDefinition, Occurrence, Venue, VerificationStatus};
use crate::sort::{sort_venues, SortBy};

/// Which span of time the timeline shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeView {
    #[default]
    Today,
    Week,
    #[serde(rename = "NEXT_24H")]
    Next24h,
}

impl FromStr for TimeView {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "today" => Ok(TimeView::Today),
            "week" => Ok(TimeView::Week),
            "next24h" => Ok(TimeView::Next24h),
            _ => Err(EngineError::UnknownOption {
                kind: "time view",
                value: s.to_string(),
                expected: "today, week, next24h",
            }),
        }
    }
}

/// A time window. Occurrences must strictly overlap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// - `Today`: local midnight through the last millisecond of the day.
    /// - `Week`: local midnight today through local midnight seven days on.
    /// - `Next24h`: `now` through `now + 24h`.
    pub fn for_view(view: TimeView, now: DateTime<Utc>) -> Self {
        let today = local_date(now);
        match view {
            TimeView::Today => Window {
                start: local_midnight(today),
                end: local_midnight(today + Duration::days(1)) - Duration::milliseconds(1),
            },
            TimeView::Week => Window {
                start: local_midnight(today),
                end: local_midnight(today + Duration::days(7)),
            },
            TimeView::Next24h => Window {
                start: now,
                end: now + Duration::hours(24),
            },
        }
    }
}

/// Everything `select` needs apart from the catalog and the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub filters: FilterCriteria,
    pub reference: Coordinate,
    pub time_view: TimeView,
    pub sort_by: SortBy,
    /// Show unverified definitions as-is instead of expanding verified ones.
    pub include_drafts_only: bool,
}

impl SelectionRequest {
    pub fn new(reference: Coordinate) -> Self {
        Self {
            filters: FilterCriteria::default(),
            reference,
            time_view: TimeView::default(),
            sort_by: SortBy::default(),
            include_drafts_only: false,
        }
    }
}

/// An occurrence with its per-call annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedOccurrence {
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub distance_km: f64,
    pub cost_value: CostValue,
    pub deadline_passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueWithDistance {
    #[serde(flatten)]
    pub venue: Venue,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub venues: Vec<VenueWithDistance>,
    /// Each venue's surviving occurrences, ordered by start.
    pub occurrences_by_venue: BTreeMap<String, Vec<AnnotatedOccurrence>>,
    pub matched_count: usize,
    pub total_generated_count: usize,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// Run the full pipeline over `definitions` at instant `now`.
pub fn select(
    definitions: &[EventDefinition],
    request: &SelectionRequest,
    now: DateTime<Utc>,
) -> Selection {
    let window = Window::for_view(request.time_view, now);

    let generated: Vec<Occurrence> = definitions
        .iter()
        .flat_map(|definition| candidates(definition, request.include_drafts_only, window))
        .collect();
    let total_generated_count = generated.len();

    let matched: Vec<AnnotatedOccurrence> = generated
        .into_iter()
        .map(|occurrence| annotate(occurrence, request.reference, now))
        .filter(|occurrence| request.filters.matches(occurrence))
        .collect();
    let matched_count = matched.len();

    let (mut venues, occurrences_by_venue) = group_by_venue(matched);
    sort_venues(&mut venues, &occurrences_by_venue, request.sort_by, now);

    debug!(
        window_start = %window.start,
        window_end = %window.end,
        total_generated_count,
        matched_count,
        venues = venues.len(),
        sort_by = ?request.sort_by,
        "selection complete"
    );

    Selection {
        venues,
        occurrences_by_venue,
        matched_count,
        total_generated_count,
        window_start: window.start,
        window_end: window.end,
    }
}

/// [`select`] with `now` sampled once from the system clock.
pub fn select_now(definitions: &[EventDefinition], request: &SelectionRequest) -> Selection {
    select(definitions, request, Utc::now())
}

fn candidates(definition: &EventDefinition, drafts_only: bool, window: Window) -> Vec<Occurrence> {
    match (drafts_only, definition.status) {
        (true, VerificationStatus::NeedsVerification) => vec![Occurrence::verbatim(definition)],
        (false, VerificationStatus::Verified) => {
            generate_occurrences(definition, window.start, window.end)
        }
        _ => Vec::new(),
    }
}

fn annotate(
    occurrence: Occurrence,
    reference: Coordinate,
    now: DateTime<Utc>,
) -> AnnotatedOccurrence {
    AnnotatedOccurrence {
        distance_km: distance_km(occurrence.venue.coordinate(), reference),
        cost_value: parse_cost(&occurrence.cost),
        deadline_passed: occurrence.deadline_passed(now),
        occurrence,
    }
}

/// Venues in first-seen order, each carrying the attributes and distance of
/// the first occurrence encountered for it.
fn group_by_venue(
    matched: Vec<AnnotatedOccurrence>,
) -> (
    Vec<VenueWithDistance>,
    BTreeMap<String, Vec<AnnotatedOccurrence>>,
) {
    let mut venues = Vec::new();
    let mut by_venue: BTreeMap<String, Vec<AnnotatedOccurrence>> = BTreeMap::new();

    for occurrence in matched {
        match by_venue.entry(occurrence.occurrence.venue.id.clone()) {
            Entry::Vacant(slot) => {
                venues.push(VenueWithDistance {
                    venue: occurrence.occurrence.venue.clone(),
                    distance_km: occurrence.distance_km,
                });
                slot.insert(vec![occurrence]);
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(occurrence),
        }
    }

    for occurrences in by_venue.values_mut() {
        occurrences.sort_by_key(|o| o.occurrence.start);
    }

    (venues, by_venue)
}
