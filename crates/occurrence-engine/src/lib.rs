//! # occurrence-engine
//!
//! Occurrence generation and venue selection for recurring food events.
//!
//! Given a catalog of event definitions (one-off, weekly, biweekly or
//! monthly) and a time window, the engine materializes every concrete
//! occurrence in the window, annotates each with its distance and parsed
//! cost, filters them, groups the survivors by venue and sorts the venues.
//! Calendar arithmetic is done in Central European local time, with
//! wall-clock times kept stable across daylight-saving transitions.
//!
//! ## Modules
//!
//! - [`catalog`] — JSON catalog ingestion and validation
//! - [`model`] — definitions, venues, occurrences
//! - [`recurrence`] — canonical recurrence rules and wire normalization
//! - [`expander`] — definition + window → occurrences
//! - [`deadline`] — per-occurrence registration deadlines
//! - [`dst`] — the fixed CEST transition rule
//! - [`calendar`] — local-calendar helpers
//! - [`geo`] — haversine distance
//! - [`cost`] — free-text cost parsing
//! - [`filter`] — filter criteria
//! - [`sort`] — venue orderings
//! - [`select`] — the full selection pipeline
//! - [`format`] — Dutch descriptions of rules
//! - [`error`] — error types

pub mod calendar;
pub mod catalog;
pub mod cost;
pub mod deadline;
pub mod dst;
pub mod error;
pub mod expander;
pub mod filter;
pub mod format;
pub mod geo;
pub mod model;
pub mod recurrence;
pub mod select;
pub mod sort;

pub use catalog::parse_catalog;
pub use cost::{parse_cost, CostValue};
pub use deadline::RegistrationDeadlineRule;
pub use error::EngineError;
pub use expander::generate_occurrences;
pub use filter::FilterCriteria;
pub use format::{describe_deadline, describe_recurrence};
pub use geo::distance_km;
pub use model::{
    AccessLevel, Coordinate, EventDefinition, Occurrence, Venue, VerificationStatus,
};
pub use recurrence::{Frequency, MonthlyPattern, RecurrenceRule, WeekOfMonth, WeekdaySet};
pub use select::{
    select, select_now, AnnotatedOccurrence, Selection, SelectionRequest, TimeView,
    VenueWithDistance, Window,
};
pub use sort::{SortBy, Tier};
