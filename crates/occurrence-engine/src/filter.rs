//! Multi-criterion occurrence filtering.
//!
//! All predicates are AND'ed. Unbounded ceilings are `None` and empty sets
//! mean "no restriction".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::AccessLevel;
use crate::select::AnnotatedOccurrence;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub max_cost: Option<f64>,
    #[serde(default)]
    pub access_levels: BTreeSet<AccessLevel>,
    #[serde(default)]
    pub event_types: BTreeSet<String>,
    /// An occurrence matches if it carries at least one of these tags.
    #[serde(default)]
    pub dietary_needs: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn matches(&self, occurrence: &AnnotatedOccurrence) -> bool {
        self.within_distance(occurrence.distance_km)
            && occurrence.cost_value.within(self.max_cost)
            && self.allows_access(occurrence.occurrence.access_level)
            && self.allows_type(&occurrence.occurrence.food_type)
            && self.meets_diet(&occurrence.occurrence.dietary_tags)
    }

    fn within_distance(&self, distance_km: f64) -> bool {
        self.max_distance_km.is_none_or(|max| distance_km <= max)
    }

    fn allows_access(&self, level: AccessLevel) -> bool {
        self.access_levels.is_empty() || self.access_levels.contains(&level)
    }

    fn allows_type(&self, food_type: &str) -> bool {
        self.event_types.is_empty() || self.event_types.contains(food_type)
    }

    fn meets_diet(&self, tags: &BTreeSet<String>) -> bool {
        self.dietary_needs.is_empty() || !self.dietary_needs.is_disjoint(tags)
    }
}
