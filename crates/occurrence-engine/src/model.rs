//! Event definitions, venues and the occurrences derived from them.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::deadline::RegistrationDeadlineRule;
use crate::error::{EngineError, Result};
use crate::recurrence::RecurrenceRule;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Venue {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// How a visitor gets access to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    WalkIn,
    Registration,
    Referral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Verified,
    /// Drafts and unconfirmed entries. The default, so a catalog record with
    /// no status never reaches the public timeline.
    #[default]
    NeedsVerification,
}

/// An immutable event template from the catalog.
///
/// `start` and `end` give the time of day and, for recurring events, the
/// anchor date no occurrence may precede.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: String,
    pub venue: Venue,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub food_type: String,
    #[serde(default)]
    pub dietary_tags: BTreeSet<String>,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub cost: String,
    #[serde(default, deserialize_with = "nullable_rule")]
    pub recurrence: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_rule: Option<RegistrationDeadlineRule>,
    /// Already-concrete deadline of a one-off event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: VerificationStatus,
}

fn nullable_rule<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<RecurrenceRule, D::Error> {
    Option::<RecurrenceRule>::deserialize(d).map(Option::unwrap_or_default)
}

impl EventDefinition {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }

    /// Reject definitions the expander cannot handle.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDefinition` for an empty id or when
    /// `end <= start`.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidDefinition {
                id: self.id.clone(),
                reason: "empty id".to_string(),
            });
        }
        if self.end <= self.start {
            return Err(EngineError::InvalidDefinition {
                id: self.id.clone(),
                reason: format!("end {} is not after start {}", self.end, self.start),
            });
        }
        Ok(())
    }
}

/// One concrete dated instance of a definition.
///
/// Built fresh for each selection call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: String,
    pub definition_id: String,
    pub venue: Venue,
    pub title: String,
    pub description: String,
    pub food_type: String,
    pub dietary_tags: BTreeSet<String>,
    pub access_level: AccessLevel,
    pub cost: String,
    pub recurrence: RecurrenceRule,
    pub status: VerificationStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl Occurrence {
    /// Copy `definition`'s displayable fields onto a new dated instance.
    pub fn from_definition(
        definition: &EventDefinition,
        id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        registration_deadline: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            definition_id: definition.id.clone(),
            venue: definition.venue.clone(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            food_type: definition.food_type.clone(),
            dietary_tags: definition.dietary_tags.clone(),
            access_level: definition.access_level,
            cost: definition.cost.clone(),
            recurrence: definition.recurrence.clone(),
            status: definition.status,
            start,
            end,
            registration_deadline,
        }
    }

    /// The definition itself as a single occurrence, with no date suffix on
    /// the id.
    pub fn verbatim(definition: &EventDefinition) -> Self {
        Self::from_definition(
            definition,
            definition.id.clone(),
            definition.start,
            definition.end,
            definition.registration_deadline,
        )
    }

    /// Strict interval overlap. Touching boundaries do not count.
    pub fn overlaps(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> bool {
        self.start < window_end && self.end > window_start
    }

    /// Whether the event is running at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }

    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.registration_deadline.is_some_and(|deadline| now > deadline)
    }
}
