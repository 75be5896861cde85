//! Daily usage records.
//!
//! Usage is counted per user, per UTC calendar day, per media kind. Exactly
//! one [`UsageRecord`] exists for a given `(user_id, day)` pair; the store's
//! ledger is the only mutator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{MediaKind, UserId};

/// A UTC calendar date with no time component, the ledger's day bucket.
///
/// Serializes as `YYYY-MM-DD`, which is also its store key encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageDay(NaiveDate);

impl UsageDay {
    /// The day bucket containing the given instant.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.date_naive())
    }

    /// Today's bucket.
    #[must_use]
    pub fn today() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for UsageDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for UsageDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveDate::parse_from_str(s, "%Y-%m-%d")?))
    }
}

/// Per-day generation counters for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// The user being counted.
    pub user_id: UserId,

    /// The UTC day bucket.
    pub day: UsageDay,

    /// Video generations consumed this day.
    pub video_count: u32,

    /// Audio generations consumed this day.
    pub audio_count: u32,

    /// When the record was lazily created.
    pub created_at: DateTime<Utc>,

    /// When a counter last changed.
    pub updated_at: DateTime<Utc>,
}

impl UsageRecord {
    /// A fresh record with zero counters.
    #[must_use]
    pub fn new(user_id: UserId, day: UsageDay) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            day,
            video_count: 0,
            audio_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The counter for the given media kind.
    #[must_use]
    pub const fn count(&self, kind: MediaKind) -> u32 {
        match kind {
            MediaKind::Video => self.video_count,
            MediaKind::Audio => self.audio_count,
        }
    }

    /// Mutable access to the counter for the given media kind.
    pub fn count_mut(&mut self, kind: MediaKind) -> &mut u32 {
        match kind {
            MediaKind::Video => &mut self.video_count,
            MediaKind::Audio => &mut self.audio_count,
        }
    }
}

/// The ledger's view of a counter right after a successful reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// The day the counter belongs to.
    pub day: UsageDay,

    /// The media kind that was reserved.
    pub kind: MediaKind,

    /// The counter value after the increment.
    pub used: u32,

    /// The limit the reservation was checked against. `None` = unlimited.
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_formats_without_time_component() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 58).unwrap();
        let day = UsageDay::from_datetime(at);
        assert_eq!(day.to_string(), "2025-03-09");
    }

    #[test]
    fn day_roundtrips_through_string() {
        let day = UsageDay::today();
        let parsed: UsageDay = day.to_string().parse().unwrap();
        assert_eq!(day, parsed);
    }

    #[test]
    fn counters_are_independent_per_kind() {
        let mut record = UsageRecord::new(UserId::generate(), UsageDay::today());
        *record.count_mut(MediaKind::Video) += 2;
        assert_eq!(record.count(MediaKind::Video), 2);
        assert_eq!(record.count(MediaKind::Audio), 0);
    }

    #[test]
    fn day_serde_is_transparent() {
        let day: UsageDay = "2025-12-31".parse().unwrap();
        assert_eq!(serde_json::to_string(&day).unwrap(), "\"2025-12-31\"");
    }
}
