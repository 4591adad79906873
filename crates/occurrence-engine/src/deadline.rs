//! Registration deadlines for recurring events.
//!
//! A [`RegistrationDeadlineRule`] is "N days before, at HH:MM". It is
//! resolved per occurrence against the occurrence's local start date.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{local_date, local_to_utc};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDeadlineRule {
    pub days_before: u32,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl RegistrationDeadlineRule {
    /// Build a rule from an `HH:MM` string.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTime` if `time` is not `HH:MM`.
    pub fn new(days_before: u32, time: &str) -> Result<Self> {
        Ok(Self {
            days_before,
            time: parse_hhmm(time).ok_or_else(|| EngineError::InvalidTime(time.to_string()))?,
        })
    }

    /// Concrete deadline for an occurrence starting at `start`: the local
    /// start date minus `days_before` days, at `time` local.
    pub fn resolve(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        let date = local_date(start) - Duration::days(i64::from(self.days_before));
        local_to_utc(date.and_time(self.time))
    }
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| de::Error::custom(format!("expected HH:MM, got '{raw}'")))
    }
}
